//! Unit tests for execution plan domain values, the in-memory store, and
//! the plan and dispatch services.

mod support;
