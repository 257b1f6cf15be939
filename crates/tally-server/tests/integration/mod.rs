pub mod auth_tests;
