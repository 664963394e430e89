//! File actions module.
//!
//! Deletion of confirmed duplicates, either permanently or via the system
//! trash. See [`delete`] for details.

pub mod delete;

pub use delete::{
    delete_file, delete_to_trash, permanent_delete, DeleteError, DeleteMode, DeleteResult,
};
