//! Cross-crate integration tests for the ICMS-ST pricing workspace live in
//! `tests/`. This library target is empty.
