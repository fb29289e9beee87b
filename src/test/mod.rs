//! Shared test support: an in-process fake target and a builder for Ruby heap images.
//!
//! [`FakeInferior`] implements [`Inferior`] over a plain byte map, so decoders can be
//! exercised against hand-crafted memory without a live process. [`RubyImage`] sits on
//! top and lays out realistic heap objects (strings, arrays, classes with extension
//! structs, symbol tables) at the field offsets the decoders resolve through layouts.


use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    encoding::RawValue,
    inferior::{FieldLayout, Inferior, TypeLayout},
    value::Session,
    Error, Result,
};

/// In-process stand-in for a paused target: byte-addressed memory, type layouts,
/// symbol addresses and canned expression results.
#[derive(Default)]
pub(crate) struct FakeInferior {
    memory: HashMap<u64, u8>,
    types: HashMap<String, Arc<TypeLayout>>,
    symbols: HashMap<String, u64>,
    evals: HashMap<String, u64>,
}

impl FakeInferior {
    pub(crate) fn new() -> FakeInferior {
        FakeInferior::default()
    }

    pub(crate) fn write_bytes(&mut self, address: u64, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.memory.insert(address + i as u64, *b);
        }
    }

    pub(crate) fn write_word(&mut self, address: u64, word: u64) {
        self.write_bytes(address, &word.to_le_bytes());
    }

    pub(crate) fn write_u32(&mut self, address: u64, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub(crate) fn set_eval(&mut self, expression: &str, value: u64) {
        self.evals.insert(expression.to_string(), value);
    }

    pub(crate) fn set_symbol(&mut self, name: &str, address: u64) {
        self.symbols.insert(name.to_string(), address);
    }

    /// Register a layout of plain word-aligned fields.
    pub(crate) fn add_layout(&mut self, name: &str, size: u64, fields: &[(&str, u64, u64)]) {
        let fields = fields
            .iter()
            .map(|(name, offset, size)| FieldLayout::plain(name, *offset, *size))
            .collect();
        self.insert_layout(name, size, fields);
    }

    pub(crate) fn insert_layout(&mut self, name: &str, size: u64, fields: Vec<FieldLayout>) {
        self.types.insert(
            name.to_string(),
            Arc::new(TypeLayout {
                name: name.to_string(),
                size,
                fields,
            }),
        );
    }
}

impl Inferior for FakeInferior {
    fn read_memory(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(len);
        for i in 0..len {
            match self.memory.get(&(address + i as u64)) {
                Some(b) => bytes.push(*b),
                None => return Err(Error::MemoryRead { address, len }),
            }
        }
        Ok(bytes)
    }

    fn lookup_type(&self, name: &str) -> Option<Arc<TypeLayout>> {
        self.types.get(name).cloned()
    }

    fn evaluate(&self, expression: &str) -> Result<u64> {
        self.evals
            .get(expression)
            .copied()
            .ok_or_else(|| Error::Inferior(format!("cannot evaluate '{expression}'")))
    }

    fn lookup_symbol(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }
}

/// Which symbol-table shape a [`RubyImage`] maintains.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SymbolShape {
    IdTable,
    Tiered,
    None,
}

/// Builder for a fake Ruby heap with the field offsets the decoders expect.
///
/// The object layouts match a 64-bit build with immediate floats and a trust
/// bit (user flags start at bit 12); [`RubyImage::legacy`] switches only the
/// parts the legacy tests exercise.
pub(crate) struct RubyImage {
    fake: FakeInferior,
    next: u64,
    legacy: bool,
    symbol_shape: SymbolShape,
    /// (name, id, string value) per interned symbol
    symbols: Vec<(String, u64, RawValue)>,
    global_symbols: u64,
    root_class: RawValue,
    root_ext: u64,
}

/// User flags start at bit 12 on the builds these images model.
const USHIFT: u32 = 12;
/// `FL_USER(1)`: string no-embed, array embed, object embed.
const FL_USER1: u64 = 1 << (USHIFT + 1);
/// `FL_USER(0)`: singleton class marker.
const FL_USER0: u64 = 1 << USHIFT;

impl RubyImage {
    /// Image for a build with immediate floats and an `id_str` symbol table.
    pub(crate) fn modern() -> RubyImage {
        let mut image = RubyImage::base(SymbolShape::IdTable);
        image.fake.set_symbol("global_symbols", image.global_symbols);
        image.fake.add_layout(
            "global_symbols",
            16,
            &[("id_str", 0, 8), ("ids", 8, 8)],
        );
        image
    }

    /// Like [`RubyImage::modern`] but with the tiered-array symbol table.
    pub(crate) fn modern_tiered() -> RubyImage {
        let mut image = RubyImage::base(SymbolShape::Tiered);
        image.fake.set_symbol("global_symbols", image.global_symbols);
        image
            .fake
            .add_layout("global_symbols", 16, &[("last_id", 0, 8), ("ids", 8, 8)]);
        image
    }

    /// Like [`RubyImage::modern`] but with the symbol table stripped entirely.
    pub(crate) fn modern_without_symbols() -> RubyImage {
        RubyImage::base(SymbolShape::None)
    }

    /// Image for a build without immediate floats, with the old `st_table` shape.
    pub(crate) fn legacy() -> RubyImage {
        let mut fake = FakeInferior::new();
        fake.set_eval("rb_equal(0, 0)", 2);
        fake.set_symbol("rb_obj_untrust", 0x1000);
        fake.insert_layout(
            "struct st_table",
            32,
            vec![
                FieldLayout::bitfield("entries_packed", 8, 8, 0, 1),
                FieldLayout::bitfield("num_entries", 8, 8, 1, 62),
                FieldLayout::plain("bins", 16, 8),
                FieldLayout::plain("head", 24, 8),
            ],
        );

        RubyImage {
            fake,
            next: 0x10000,
            legacy: true,
            symbol_shape: SymbolShape::None,
            symbols: Vec::new(),
            global_symbols: 0,
            root_class: RawValue(0),
            root_ext: 0,
        }
    }

    fn base(symbol_shape: SymbolShape) -> RubyImage {
        let mut fake = FakeInferior::new();
        fake.set_eval("rb_equal(0, 0)", 20);
        fake.set_symbol("rb_obj_untrust", 0x1000);
        install_modern_layouts(&mut fake);

        let mut image = RubyImage {
            fake,
            next: 0x10000,
            legacy: false,
            symbol_shape,
            symbols: Vec::new(),
            global_symbols: 0,
            root_class: RawValue(0),
            root_ext: 0,
        };

        // global_symbols struct: id_str table pointer and ids array, both empty
        image.global_symbols = image.alloc(16);
        image.fake.write_word(image.global_symbols, 0);
        image.fake.write_word(image.global_symbols + 8, 0);

        // Root object class with empty extension tables, for constant searches
        let (root, root_ext) = image.new_class(0x02, None);
        image.root_class = root;
        image.root_ext = root_ext;
        image.fake.set_eval("rb_cObject", root.address());

        image
    }

    /// Open a decoding session against this image.
    pub(crate) fn session(&self) -> Session<'_> {
        Session::new(&self.fake).unwrap()
    }

    fn alloc(&mut self, size: u64) -> u64 {
        let address = self.next;
        self.next += (size + 15) & !15;
        address
    }

    /// Immediate fixnum word for `n`.
    pub(crate) fn fixnum(n: i64) -> RawValue {
        RawValue(((n << 1) | 1) as u64)
    }

    // ---- symbols ----

    /// Intern `name`, returning its ID. Idempotent per name.
    pub(crate) fn intern_symbol(&mut self, name: &str) -> u64 {
        if let Some((_, id, _)) = self.symbols.iter().find(|(n, _, _)| n == name) {
            return *id;
        }
        let serial = self.symbols.len() as u64;
        let id = serial << 4;
        let value = self.string_value(name);
        self.symbols.push((name.to_string(), id, value));
        self.rebuild_symbol_table();
        id
    }

    /// Static-symbol `VALUE` for `name`, interning it first.
    pub(crate) fn symbol_value(&mut self, name: &str) -> RawValue {
        RawValue((self.intern_symbol(name) << 8) | 0xc)
    }

    fn rebuild_symbol_table(&mut self) {
        match self.symbol_shape {
            SymbolShape::IdTable => {
                let pairs: Vec<(u64, u64)> = self
                    .symbols
                    .iter()
                    .map(|(_, id, value)| (*id, value.0))
                    .collect();
                let table = self.st_table(&pairs);
                self.fake.write_word(self.global_symbols, table);
            }
            SymbolShape::Tiered => {
                // One bucket holding every (string, id) pair, so serial / unit
                // is always bucket zero
                let mut words = Vec::new();
                for (_, id, value) in &self.symbols {
                    words.push(*value);
                    words.push(RawValue(*id));
                }
                let bucket = self.heap_array(&words);
                let outer = self.heap_array(&[bucket]);
                self.fake.write_word(self.global_symbols + 8, outer.0);
            }
            SymbolShape::None => {}
        }
    }

    // ---- strings ----

    fn string_value(&mut self, text: &str) -> RawValue {
        if text.len() <= 23 {
            self.embedded_string(text)
        } else {
            self.heap_string(text)
        }
    }

    /// String stored inline in the object slot; `text` must fit the embed slot.
    pub(crate) fn embedded_string(&mut self, text: &str) -> RawValue {
        assert!(text.len() <= 23);
        let address = self.alloc(40);
        let flags = 0x05 | ((text.len() as u64) << (USHIFT + 2));
        self.fake.write_word(address, flags);
        self.fake.write_word(address + 8, 0);
        let mut slot = [0u8; 24];
        slot[..text.len()].copy_from_slice(text.as_bytes());
        self.fake.write_bytes(address + 16, &slot);
        RawValue(address)
    }

    /// String with a separate character buffer.
    pub(crate) fn heap_string(&mut self, text: &str) -> RawValue {
        self.heap_string_with_len(text, text.len() as u64)
    }

    /// Heap string whose length field disagrees with the stored bytes.
    pub(crate) fn heap_string_with_len(&mut self, text: &str, len: u64) -> RawValue {
        let buffer = self.alloc(text.len().max(1) as u64);
        self.fake.write_bytes(buffer, text.as_bytes());

        let address = self.alloc(40);
        self.fake.write_word(address, 0x05 | FL_USER1);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, len);
        self.fake.write_word(address + 24, buffer);
        RawValue(address)
    }

    // ---- arrays ----

    /// Array with a separate element buffer.
    pub(crate) fn heap_array(&mut self, elements: &[RawValue]) -> RawValue {
        let buffer = self.alloc((elements.len().max(1) * 8) as u64);
        for (i, element) in elements.iter().enumerate() {
            self.fake.write_word(buffer + (i * 8) as u64, element.0);
        }

        let address = self.alloc(40);
        self.fake.write_word(address, 0x07);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, elements.len() as u64);
        self.fake.write_word(address + 24, buffer);
        RawValue(address)
    }

    /// Array with elements stored inline in the object slot (at most three).
    pub(crate) fn embedded_array(&mut self, elements: &[RawValue]) -> RawValue {
        assert!(elements.len() <= 3);
        let address = self.alloc(40);
        let flags = 0x07 | FL_USER1 | ((elements.len() as u64) << (USHIFT + 3));
        self.fake.write_word(address, flags);
        self.fake.write_word(address + 8, 0);
        for (i, element) in elements.iter().enumerate() {
            self.fake.write_word(address + 16 + (i * 8) as u64, element.0);
        }
        RawValue(address)
    }

    /// Two-element heap array holding `first` and then itself.
    pub(crate) fn self_referential_array(&mut self, first: RawValue) -> RawValue {
        let buffer = self.alloc(16);
        let address = self.alloc(40);
        self.fake.write_word(address, 0x07);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, 2);
        self.fake.write_word(address + 24, buffer);
        self.fake.write_word(buffer, first.0);
        self.fake.write_word(buffer + 8, address);
        RawValue(address)
    }

    // ---- st_table ----

    /// Packed table in the image's native shape (new-style entry array, or the
    /// old bins-as-pairs representation on legacy images).
    pub(crate) fn st_table(&mut self, pairs: &[(u64, u64)]) -> u64 {
        if self.legacy {
            let bins = self.alloc((pairs.len().max(1) * 16) as u64);
            for (i, (key, value)) in pairs.iter().enumerate() {
                self.fake.write_word(bins + (i * 16) as u64, *key);
                self.fake.write_word(bins + (i * 16 + 8) as u64, *value);
            }
            let table = self.alloc(32);
            self.fake.write_word(table + 8, ((pairs.len() as u64) << 1) | 1);
            self.fake.write_word(table + 16, bins);
            table
        } else {
            let entries = self.alloc((pairs.len().max(1) * 24) as u64);
            for (i, (key, value)) in pairs.iter().enumerate() {
                let entry = entries + (i * 24) as u64;
                self.fake.write_word(entry + 8, *key);
                self.fake.write_word(entry + 16, *value);
            }
            let table = self.alloc(40);
            self.fake.write_word(table + 8, ((pairs.len() as u64) << 1) | 1);
            self.fake.write_word(table + 16, entries);
            self.fake.write_word(table + 24, pairs.len() as u64);
            table
        }
    }

    /// New-style table whose entries hang off the bucket chain.
    pub(crate) fn st_table_chained(&mut self, pairs: &[(u64, u64)]) -> u64 {
        let mut head = 0u64;
        for (key, value) in pairs.iter().rev() {
            let entry = self.alloc(40);
            self.fake.write_word(entry + 8, *key);
            self.fake.write_word(entry + 16, *value);
            self.fake.write_word(entry + 32, head);
            head = entry;
        }
        let table = self.alloc(40);
        self.fake.write_word(table + 8, (pairs.len() as u64) << 1);
        self.fake.write_word(table + 16, head);
        table
    }

    /// Chained table whose single entry's `fore` pointer loops back to itself.
    pub(crate) fn st_table_self_looping_chain(&mut self, key: u64, value: u64) -> u64 {
        let entry = self.alloc(40);
        self.fake.write_word(entry + 8, key);
        self.fake.write_word(entry + 16, value);
        self.fake.write_word(entry + 32, entry);

        let table = self.alloc(40);
        self.fake.write_word(table + 8, 1 << 1);
        self.fake.write_word(table + 16, entry);
        table
    }

    // ---- hashes ----

    /// Hash backed by a packed table of raw `VALUE` pairs.
    pub(crate) fn hash(&mut self, pairs: &[(RawValue, RawValue)]) -> RawValue {
        let raw: Vec<(u64, u64)> = pairs.iter().map(|(k, v)| (k.0, v.0)).collect();
        let table = self.st_table(&raw);
        self.hash_with_table_ptr(table)
    }

    /// Hash whose table pointer is null (a valid empty hash).
    pub(crate) fn hash_with_null_table(&mut self) -> RawValue {
        self.hash_with_table_ptr(0)
    }

    /// Hash pointing at an arbitrary table address, mapped or not.
    pub(crate) fn hash_with_table_ptr(&mut self, table: u64) -> RawValue {
        let address = self.alloc(48);
        self.fake.write_word(address, 0x08);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, table);
        RawValue(address)
    }

    /// Hash with one entry mapping `key` to the hash itself.
    pub(crate) fn self_referential_hash(&mut self, key: RawValue) -> RawValue {
        let hash = self.hash_with_null_table();
        let table = self.st_table(&[(key.0, hash.0)]);
        self.fake.write_word(hash.address() + 16, table);
        hash
    }

    // ---- classes and modules ----

    fn new_class(&mut self, flags: u64, classpath: Option<&str>) -> (RawValue, u64) {
        let ext = self.alloc(24);
        self.fake.write_word(ext, 0);
        self.fake.write_word(ext + 8, 0);
        self.fake.write_word(ext + 16, 0);

        let address = self.alloc(40);
        self.fake.write_word(address, flags);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, ext);
        self.fake.write_word(address + 24, 0);

        if let Some(name) = classpath {
            let classpath_id = self.intern_symbol("__classpath__");
            let path = self.string_value(name);
            let iv_tbl = self.st_table(&[(classpath_id, path.0)]);
            self.fake.write_word(ext, iv_tbl);
        }
        (RawValue(address), ext)
    }

    /// Class carrying its name in the hidden classpath instance variable.
    pub(crate) fn class_with_classpath(&mut self, name: &str) -> RawValue {
        self.new_class(0x02, Some(name)).0
    }

    /// Class with no classpath ivar and no constant binding anywhere.
    pub(crate) fn anonymous_class(&mut self) -> RawValue {
        self.new_class(0x02, None).0
    }

    /// Module with no classpath ivar and no constant binding anywhere.
    pub(crate) fn anonymous_module(&mut self) -> RawValue {
        self.new_class(0x03, None).0
    }

    /// Class `inner` bound as a constant of module `outer`, which is bound under
    /// the root; neither carries a classpath ivar.
    pub(crate) fn nested_class(&mut self, outer: &str, inner: &str) -> RawValue {
        let (module, module_ext) = self.new_class(0x03, None);
        let (class, _) = self.new_class(0x02, None);

        let outer_id = self.intern_symbol(outer);
        let inner_id = self.intern_symbol(inner);

        let inner_entry = self.const_entry(class);
        let inner_tbl = self.st_table(&[(inner_id, inner_entry)]);
        self.fake.write_word(module_ext + 8, inner_tbl);

        let outer_entry = self.const_entry(module);
        let outer_tbl = self.st_table(&[(outer_id, outer_entry)]);
        self.fake.write_word(self.root_ext + 8, outer_tbl);

        class
    }

    fn const_entry(&mut self, value: RawValue) -> u64 {
        let entry = self.alloc(24);
        self.fake.write_word(entry + 16, value.0);
        entry
    }

    /// Singleton class whose `super` chain leads to a real named class.
    /// Returns `(singleton, real)`.
    pub(crate) fn singleton_of_class(&mut self, name: &str) -> (RawValue, RawValue) {
        let real = self.class_with_classpath(name);
        let (singleton, _) = self.new_class(0x02 | FL_USER0, None);
        self.fake.write_word(singleton.address() + 24, real.0);
        (singleton, real)
    }

    // ---- objects ----

    /// Object of a freshly named class with the given ivars in its embed slots.
    pub(crate) fn object(&mut self, class_name: &str, ivars: &[(&str, RawValue)]) -> RawValue {
        assert!(ivars.len() <= 3);
        let (class, ext) = self.new_class(0x02, Some(class_name));

        let index_pairs: Vec<(u64, u64)> = ivars
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                let id = self.intern_symbol(name);
                (id, i as u64)
            })
            .collect();
        let index_tbl = self.st_table(&index_pairs);
        self.fake.write_word(ext + 16, index_tbl);

        let address = self.alloc(40);
        self.fake.write_word(address, 0x01 | FL_USER1);
        self.fake.write_word(address + 8, class.0);
        for (i, (_, value)) in ivars.iter().enumerate() {
            self.fake.write_word(address + 16 + (i * 8) as u64, value.0);
        }
        RawValue(address)
    }

    /// Object whose single ivar holds the object itself.
    pub(crate) fn self_referential_object(&mut self, class_name: &str, ivar: &str) -> RawValue {
        let placeholder = RubyImage::fixnum(0);
        let object = self.object(class_name, &[(ivar, placeholder)]);
        self.fake.write_word(object.address() + 16, object.0);
        object
    }

    /// Object whose class pointer leads into unmapped memory.
    pub(crate) fn object_with_bad_class(&mut self) -> RawValue {
        let address = self.alloc(40);
        self.fake.write_word(address, 0x01 | FL_USER1);
        self.fake.write_word(address + 8, 0xbad_0000);
        RawValue(address)
    }

    // ---- regexps ----

    /// Compiled regexp with the given source text and option bits.
    pub(crate) fn regexp(&mut self, source: &str, options: u32) -> RawValue {
        let src = self.string_value(source);
        let pattern = self.alloc(64);
        self.fake.write_u32(pattern + 40, options);

        let address = self.alloc(40);
        self.fake.write_word(address, 0x06);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, pattern);
        self.fake.write_word(address + 24, src.0);
        RawValue(address)
    }

    // ---- files ----

    /// IO object of a freshly named class with the given path and descriptor.
    pub(crate) fn file(&mut self, class_name: &str, path: Option<&str>, fd: i32) -> RawValue {
        let class = self.class_with_classpath(class_name);
        let pathv = match path {
            Some(path) => self.string_value(path),
            // Qnil on these builds
            None => RawValue(8),
        };

        let fptr = self.alloc(32);
        self.fake.write_u32(fptr + 8, fd as u32);
        self.fake.write_word(fptr + 16, pathv.0);

        let address = self.alloc(24);
        self.fake.write_word(address, 0x0b);
        self.fake.write_word(address + 8, class.0);
        self.fake.write_word(address + 16, fptr);
        RawValue(address)
    }

    /// IO object whose descriptor struct pointer is null.
    pub(crate) fn file_without_fptr(&mut self) -> RawValue {
        let address = self.alloc(24);
        self.fake.write_word(address, 0x0b);
        self.fake.write_word(address + 8, 0);
        self.fake.write_word(address + 16, 0);
        RawValue(address)
    }
}

fn install_modern_layouts(fake: &mut FakeInferior) {
    fake.add_layout("struct RBasic", 16, &[("flags", 0, 8), ("klass", 8, 8)]);
    fake.add_layout(
        "struct RString",
        40,
        &[
            ("basic.flags", 0, 8),
            ("basic.klass", 8, 8),
            ("as.heap.len", 16, 8),
            ("as.heap.ptr", 24, 8),
            ("as.ary", 16, 24),
        ],
    );
    fake.add_layout(
        "struct RArray",
        40,
        &[
            ("basic.flags", 0, 8),
            ("basic.klass", 8, 8),
            ("as.heap.len", 16, 8),
            ("as.heap.ptr", 24, 8),
            ("as.ary", 16, 24),
        ],
    );
    fake.add_layout(
        "struct RObject",
        40,
        &[
            ("basic.flags", 0, 8),
            ("basic.klass", 8, 8),
            ("as.heap.numiv", 16, 8),
            ("as.heap.ivptr", 24, 8),
            ("as.ary", 16, 24),
        ],
    );
    fake.add_layout(
        "struct RClass",
        40,
        &[
            ("basic.flags", 0, 8),
            ("basic.klass", 8, 8),
            ("ptr", 16, 8),
            ("super", 24, 8),
        ],
    );
    fake.add_layout(
        "rb_classext_t",
        24,
        &[("iv_tbl", 0, 8), ("const_tbl", 8, 8), ("iv_index_tbl", 16, 8)],
    );
    fake.add_layout(
        "rb_const_entry_t",
        24,
        &[("flag", 0, 8), ("value", 16, 8)],
    );
    fake.add_layout("struct RFloat", 24, &[("float_value", 16, 8)]);
    fake.add_layout(
        "struct RRegexp",
        40,
        &[("ptr", 16, 8), ("src", 24, 8)],
    );
    fake.add_layout("struct re_pattern_buffer", 64, &[("options", 40, 4)]);
    fake.add_layout("struct RHash", 48, &[("ntbl", 16, 8)]);
    fake.add_layout("struct RFile", 24, &[("fptr", 16, 8)]);
    fake.add_layout("rb_io_t", 32, &[("fd", 8, 4), ("pathv", 16, 8)]);
    fake.add_layout(
        "struct RRational",
        32,
        &[("num", 16, 8), ("den", 24, 8)],
    );
    fake.add_layout(
        "struct RComplex",
        32,
        &[("real", 16, 8), ("imag", 24, 8)],
    );

    fake.insert_layout(
        "struct st_table",
        40,
        vec![
            FieldLayout::bitfield("entries_packed", 8, 8, 0, 1),
            FieldLayout::bitfield("num_entries", 8, 8, 1, 62),
            FieldLayout::plain("as.packed.entries", 16, 8),
            FieldLayout::plain("as.packed.real_entries", 24, 8),
            FieldLayout::plain("as.big.head", 16, 8),
        ],
    );
    fake.add_layout(
        "st_packed_entry",
        24,
        &[("hash", 0, 8), ("key", 8, 8), ("val", 16, 8)],
    );
    fake.add_layout(
        "st_table_entry",
        40,
        &[
            ("hash", 0, 8),
            ("key", 8, 8),
            ("record", 16, 8),
            ("next", 24, 8),
            ("fore", 32, 8),
        ],
    );
}
