#![doc = "gh-publish-core: core logic library for gh-publish."]

//! This crate contains everything gh-publish does apart from argument parsing:
//! configuration types, the ignore filter, directory scanning, the GitHub
//! contents publisher and the git push driver.
//!
//! # Usage
//! Build a [`config::PublishConfig`], then hand it to either
//! [`github::publish_project`] (REST API path) or [`git::PushDriver`]
//! (git CLI path). Both seams to the outside world are traits in
//! [`contract`] so they can be mocked.

pub mod config;
pub mod console;
pub mod contract;
pub mod git;
pub mod github;
pub mod ignore;
pub mod scan;
