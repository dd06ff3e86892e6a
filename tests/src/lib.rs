//! Cross-crate scenarios: the discovery service and the onboarding engine
//! wired to scripted collaborators.
#![cfg(test)]

mod discovery;
mod onboarding;
mod support;
