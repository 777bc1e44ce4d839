//! In-memory model manager.
//!
//! Rows live in a `BTreeMap` keyed by primary key behind a
//! `parking_lot::RwLock`, so iteration order is insertion (id) order and
//! clones of a manager share the same table.

use crate::model::Model;
use classifieds_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

struct Table<M> {
	rows: BTreeMap<i64, M>,
	next_id: i64,
}

/// Manager for a single model table.
pub struct Manager<M: Model> {
	table: Arc<RwLock<Table<M>>>,
}

impl<M: Model> Clone for Manager<M> {
	fn clone(&self) -> Self {
		Self {
			table: Arc::clone(&self.table),
		}
	}
}

impl<M: Model> Default for Manager<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Model> Manager<M> {
	pub fn new() -> Self {
		Self {
			table: Arc::new(RwLock::new(Table {
				rows: BTreeMap::new(),
				next_id: 1,
			})),
		}
	}

	/// Insert a new row.
	///
	/// Rows without a primary key get the next free id. Rows that already
	/// carry one keep it, and the sequence moves past it.
	pub fn create(&self, mut object: M) -> Result<M> {
		let mut table = self.table.write();
		let id = match object.primary_key() {
			Some(id) if table.rows.contains_key(&id) => {
				return Err(Error::BadRequest(format!(
					"{} with id {} already exists",
					M::table_name(),
					id
				)));
			}
			Some(id) => id,
			None => table.next_id,
		};
		object.set_primary_key(id);
		table.next_id = table.next_id.max(id + 1);
		table.rows.insert(id, object.clone());
		tracing::debug!(table = M::table_name(), id, "row created");
		Ok(object)
	}

	pub fn get(&self, id: i64) -> Result<M> {
		self.table
			.read()
			.rows
			.get(&id)
			.cloned()
			.ok_or_else(|| not_found::<M>(id))
	}

	pub fn exists(&self, id: i64) -> bool {
		self.table.read().rows.contains_key(&id)
	}

	/// All rows in primary key order.
	pub fn all(&self) -> Vec<M> {
		self.table.read().rows.values().cloned().collect()
	}

	/// Rows matching `predicate`, in primary key order.
	pub fn filter<F>(&self, predicate: F) -> Vec<M>
	where
		F: Fn(&M) -> bool,
	{
		self.table
			.read()
			.rows
			.values()
			.filter(|row| predicate(row))
			.cloned()
			.collect()
	}

	pub fn count(&self) -> usize {
		self.table.read().rows.len()
	}

	/// Replace a saved row.
	pub fn update(&self, object: M) -> Result<M> {
		let id = object
			.primary_key()
			.ok_or_else(|| Error::Internal(format!("cannot update unsaved {}", M::table_name())))?;
		let mut table = self.table.write();
		match table.rows.get_mut(&id) {
			Some(row) => {
				*row = object.clone();
				Ok(object)
			}
			None => Err(not_found::<M>(id)),
		}
	}

	/// Modify a row in place under the write lock.
	///
	/// If `change` fails the stored row is left untouched.
	pub fn update_with<F>(&self, id: i64, change: F) -> Result<M>
	where
		F: FnOnce(&mut M) -> Result<()>,
	{
		let mut table = self.table.write();
		let row = table.rows.get_mut(&id).ok_or_else(|| not_found::<M>(id))?;
		let mut updated = row.clone();
		change(&mut updated)?;
		updated.set_primary_key(id);
		*row = updated.clone();
		Ok(updated)
	}

	/// Remove a row and return it.
	pub fn delete(&self, id: i64) -> Result<M> {
		let removed = self
			.table
			.write()
			.rows
			.remove(&id)
			.ok_or_else(|| not_found::<M>(id))?;
		tracing::debug!(table = M::table_name(), id, "row deleted");
		Ok(removed)
	}

	/// Remove every row and reset the id sequence.
	pub fn clear(&self) {
		let mut table = self.table.write();
		table.rows.clear();
		table.next_id = 1;
	}
}

fn not_found<M: Model>(id: i64) -> Error {
	Error::NotFound(format!("{} with id {} does not exist", M::table_name(), id))
}
