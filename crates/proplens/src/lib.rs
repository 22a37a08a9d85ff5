//! # proplens
//!
//! Name- and position-indexed dictionary views over a struct's public
//! properties, without modifying the struct itself and with per-access cost
//! close to direct field access.
//!
//! The crate is built around four pieces:
//! - **Accessor compilation** (`accessor`): each property's metadata is
//!   turned once into a reusable get/set function pair operating on untyped
//!   instance references.
//! - **Per-type caching** (`cache`, `table`): a type's pairs are assembled
//!   into an ordered, immutable [`AccessorTable`] exactly once per process
//!   and shared by every view over that type.
//! - **Zero values** (`defaults`): assigning an absent value to a property
//!   substitutes the value type's zero value.
//! - **The facade** (`view`): [`DynamicView`] / [`TypedView`] expose get/set
//!   by name, get by position, containment, enumeration, and rendering over
//!   a single wrapped instance.
//!
//! Types opt in through the [`Reflectable`] trait, usually generated with
//! the [`reflectable!`] macro:
//!
//! ```rust,ignore
//! use proplens::{reflectable, DynamicView};
//!
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! reflectable! {
//!     Person {
//!         name: String,
//!         age: i32,
//!     }
//! }
//!
//! let person = Person { name: "Ada".to_string(), age: 36 };
//! let mut view = DynamicView::wrap(person)?;
//!
//! assert_eq!(view.get_as::<i32>("age")?, 36);
//! view.set_as::<i32>("age", Some(37))?;
//! println!("{view}");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use std::any::Any;

pub mod accessor;
pub mod cache;
pub mod defaults;
pub mod error;
mod macros;
pub mod metadata;
pub mod table;
pub mod view;

/// An untyped, widened property value, as produced by compiled getters and
/// consumed by compiled setters. "Absent" is modeled as `Option::<DynValue>::None`,
/// distinct from a present zero value.
pub type DynValue = Box<dyn Any>;

pub use accessor::{AccessorPair, GetFn, SetFn};
pub use cache::{global_cache, TypeAccessorCache};
pub use defaults::DefaultValueProvider;
pub use error::ViewError;
pub use metadata::{PropValue, PropertyDescriptor, Reflectable};
pub use table::AccessorTable;
pub use view::{DynamicView, Entries, TypedView};
