mod backend_agreement_tests;
mod sql_filter_tests;
