//! Unit tests for user domain values and the user service.

mod domain_tests;
