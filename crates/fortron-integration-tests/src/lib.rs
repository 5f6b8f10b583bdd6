//! Cross-crate tests for the fortron grid. See `tests/`.
