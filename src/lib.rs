//! Core library for the fertiscan-metadata command line application.
//!
//! The library converts fertilizer label inspections between the flat
//! analysis form produced by the digitization pipeline and the nested
//! inspection document stored in the label database. The document model
//! lives in [`fertiscan::metadata::model`], the form-to-document path in
//! [`fertiscan::metadata::import`], the store-to-document path in
//! [`fertiscan::metadata::export`], and file orchestration under
//! [`fertiscan::metadata::sync`].

pub mod fertiscan;

pub use fertiscan::metadata::{
    MetadataError, Result, align, error, export, form, import, model, parse, store, sync,
};
