//! Workspace root. Carries no code of its own — see `weave` for the
//! umbrella crate, or any `weave-*` member for a single component.
//! `tests/` holds cross-crate end-to-end scenarios exercised through the
//! `weave` facade's `full` feature.
