//! HTTP implementation of [`crate::RemoteSync`].

mod client;

pub use client::LabApiClient;
