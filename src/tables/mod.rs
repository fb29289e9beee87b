//! Readers for the runtime's internal `st_table` hash tables.
//!
//! Hashes, instance-variable indexes, constant tables and (on some builds) the global
//! symbol table are all `st_table`s in the target. Two physical layouts exist and both
//! must be supported: a packed contiguous array of entries with an explicit count, and
//! a chain of bucket entries linked through a `fore` pointer. Which field spellings are
//! present differs again between builds (`as.packed.*`/`as.big.*` vs bare
//! `bins`/`head`), so every access retries the alternate spelling before giving up.
//!
//! A count and a chain read out of a hostile process can disagree; iteration is
//! therefore capped rather than trusted to terminate on its own.

pub(crate) mod symbols;

use log::debug;

use crate::{value::Session, Error, Result};

/// Upper bound on entries walked in one table, packed or chained.
///
/// An inconsistent or corrupt table degrades to a short read instead of an
/// unbounded walk.
const ST_MAX_ENTRIES: u64 = 1 << 16;

/// View over an `st_table *` in the target.
///
/// Produces raw `(key, value)` word pairs; both sides usually need further
/// decoding. A null table pointer is a valid, empty table.
pub struct StTable<'s, 'i> {
    session: &'s Session<'i>,
    address: u64,
}

impl<'s, 'i> StTable<'s, 'i> {
    /// Wrap a raw `st_table *`.
    #[must_use]
    pub fn new(session: &'s Session<'i>, address: u64) -> StTable<'s, 'i> {
        StTable { session, address }
    }

    /// `true` when the underlying table pointer is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.address == 0
    }

    /// Collect the table's `(key, value)` pairs in iteration order.
    ///
    /// # Errors
    /// Returns an error if the table structure itself cannot be read; a merely
    /// over-long or inconsistent table is cut off at the sanity cap instead.
    pub fn entries(&self) -> Result<Vec<(u64, u64)>> {
        if self.is_null() {
            return Ok(Vec::new());
        }

        let layout = self.session.layout("struct st_table")?;
        let new_style = layout.fields.iter().any(|f| f.name.starts_with("as."));
        let mem = self.session.mem();

        let packed = self
            .session
            .read_struct_field("struct st_table", self.address, &["entries_packed"])?
            != 0;

        let mut pairs = Vec::new();
        if packed {
            if new_style {
                let count = self.session.read_struct_field(
                    "struct st_table",
                    self.address,
                    &["as.packed.real_entries"],
                )?;
                let entries = self.session.read_struct_field(
                    "struct st_table",
                    self.address,
                    &["as.packed.entries"],
                )?;
                let entry_layout = self.session.layout("st_packed_entry")?;
                let key_field = self.session.struct_field("st_packed_entry", &["key"])?;
                let val_field = self.session.struct_field("st_packed_entry", &["val"])?;

                for i in 0..count.min(ST_MAX_ENTRIES) {
                    let entry = mem.element_address(entries, i, entry_layout.size)?;
                    pairs.push((
                        mem.read_field(entry, &key_field)?,
                        mem.read_field(entry, &val_field)?,
                    ));
                }
                if count > ST_MAX_ENTRIES {
                    debug!("st_table at {:#x} claims {} entries, capped", self.address, count);
                }
            } else {
                // Old packed representation reuses the bins array as key/value pairs.
                let count = self.session.read_struct_field(
                    "struct st_table",
                    self.address,
                    &["num_entries"],
                )?;
                let bins = self
                    .session
                    .read_struct_field("struct st_table", self.address, &["bins"])?;
                let word = mem.word_size();

                for i in 0..count.min(ST_MAX_ENTRIES) {
                    pairs.push((
                        mem.read_word(mem.element_address(bins, 2 * i, word)?)?,
                        mem.read_word(mem.element_address(bins, 2 * i + 1, word)?)?,
                    ));
                }
            }
        } else {
            let head = if new_style {
                self.session
                    .read_struct_field("struct st_table", self.address, &["as.big.head"])?
            } else {
                self.session
                    .read_struct_field("struct st_table", self.address, &["head"])?
            };

            let key_field = self.session.struct_field("st_table_entry", &["key"])?;
            let record_field = self.session.struct_field("st_table_entry", &["record"])?;
            let fore_field = self.session.struct_field("st_table_entry", &["fore"])?;

            let mut entry = head;
            let mut steps = 0u64;
            while entry != 0 {
                if steps >= ST_MAX_ENTRIES {
                    debug!("st_table chain at {:#x} exceeds cap, stopping", self.address);
                    break;
                }
                pairs.push((
                    mem.read_field(entry, &key_field)?,
                    mem.read_field(entry, &record_field)?,
                ));
                entry = mem.read_field(entry, &fore_field)?;
                steps += 1;
            }
        }

        Ok(pairs)
    }

    /// Scan for an entry whose raw key bits equal `key`.
    ///
    /// # Errors
    /// Returns [`Error::KeyNotFound`] when the table is exhausted without a match,
    /// or a read error if the table structure itself is unreadable.
    pub fn lookup(&self, key: u64) -> Result<u64> {
        for (k, v) in self.entries()? {
            if k == key {
                return Ok(v);
            }
        }
        Err(Error::KeyNotFound(key))
    }
}
