//! Cross-stage integration tests over synthetic sweep tables.
