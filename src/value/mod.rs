//! Value decoding: the session, the per-type decoders, and the dispatch between them.
//!
//! [`Session`] is the entry point for everything after construction: it owns the access
//! to the paused target, the detected [`EncodingProfile`](crate::encoding::EncodingProfile),
//! and a cache of target type layouts. A raw word goes through [`Session::classify`] to a
//! [`TypeTag`], through [`Session::decode`] to a [`DecodedValue`], and from there to either
//! a structured [`ProxyValue`] or a bounded display string.
//!
//! Dispatch over the tag set is one closed `match`; there is no registry. Every per-type
//! decoder lives in its own submodule and treats target memory as hostile: a failed or
//! nonsensical read degrades that one value to the generic
//! `<VALUE at remote 0xADDR>` fallback and leaves siblings intact.

pub(crate) mod array;
pub(crate) mod class;
pub(crate) mod file;
pub(crate) mod hash;
pub(crate) mod object;
pub(crate) mod proxy;
pub(crate) mod regexp;
pub(crate) mod scalar;
pub(crate) mod string;

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

pub use proxy::ProxyValue;

use crate::{
    encoding::{classify_immediate, EncodingProfile, RawValue, TypeTag, RUBY_T_MASK},
    inferior::{FieldLayout, Inferior, Mem, TypeLayout},
    render::{ReprWriter, VisitedSet, WriteResult},
    tables::symbols,
    Error, Result,
};

/// Decoding strategy selected for one raw value.
///
/// Mostly a one-to-one image of [`TypeTag`], with the two differences the tag alone
/// cannot express: a `Float` tag is split into immediate flonum vs heap-boxed float,
/// and everything without a structural decoder (struct, bignum, undef, corrupt
/// headers, ...) collapses into [`DecodeKind::Opaque`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// Immediate small integer
    Fixnum,
    /// Immediate float
    Flonum,
    /// Heap-boxed float
    BoxedFloat,
    /// `nil`
    Nil,
    /// `true`
    True,
    /// `false`
    False,
    /// Interned symbol
    Symbol,
    /// String
    String,
    /// Array
    Array,
    /// Hash
    Hash,
    /// Regular expression
    Regexp,
    /// Object with instance variables
    Object,
    /// Class, module or include wrapper; the tag is kept for name fallbacks
    Class(TypeTag),
    /// IO object
    File,
    /// Exact fraction
    Rational,
    /// Complex number
    Complex,
    /// No structural decoder: renders as `<VALUE at remote 0xADDR>`
    Opaque,
}

/// A raw value paired with the decoding strategy chosen for it.
///
/// This is a view, not storage: all payload bytes stay in the target and are read
/// on demand through the session.
#[derive(Debug, Clone, Copy)]
pub struct DecodedValue {
    /// The raw value word
    pub raw: RawValue,
    /// Which decoder applies to it
    pub kind: DecodeKind,
}

/// One inspection session against a paused target process.
///
/// Holds the encoding profile (detected once, at construction) and a lazily filled
/// cache of type layouts. Single-threaded by design: the target is stopped, there is
/// exactly one caller, and all traversal state is passed explicitly.
pub struct Session<'i> {
    inferior: &'i dyn Inferior,
    profile: EncodingProfile,
    layouts: RefCell<HashMap<String, Option<Arc<TypeLayout>>>>,
    classpath_id: OnceCell<Option<u64>>,
}

impl<'i> Session<'i> {
    /// Open a session, detecting the target's encoding profile.
    ///
    /// # Errors
    /// Returns [`Error::ProfileDetection`] if the target's value encoding matches
    /// no known variant. That failure is fatal; there is no per-value recovery
    /// without a profile.
    pub fn new(inferior: &'i dyn Inferior) -> Result<Session<'i>> {
        let profile = EncodingProfile::detect(inferior)?;
        Ok(Session::with_profile(inferior, profile))
    }

    /// Open a session with an already-known encoding profile.
    #[must_use]
    pub fn with_profile(inferior: &'i dyn Inferior, profile: EncodingProfile) -> Session<'i> {
        Session {
            inferior,
            profile,
            layouts: RefCell::new(HashMap::new()),
            classpath_id: OnceCell::new(),
        }
    }

    /// The encoding profile this session decodes with.
    #[must_use]
    pub fn profile(&self) -> &EncodingProfile {
        &self.profile
    }

    /// Typed read helpers over the target's memory.
    #[must_use]
    pub fn mem(&self) -> Mem<'i> {
        Mem::new(self.inferior, self.profile.pointer_width)
    }

    /// The raw target access interface.
    #[must_use]
    pub fn inferior(&self) -> &'i dyn Inferior {
        self.inferior
    }

    /// Layout of a named target type, cached per session.
    ///
    /// # Errors
    /// Returns [`Error::LayoutMissing`] if the host has no layout for the name.
    pub fn layout(&self, name: &str) -> Result<Arc<TypeLayout>> {
        let mut cache = self.layouts.borrow_mut();
        let entry = cache
            .entry(name.to_string())
            .or_insert_with(|| self.inferior.lookup_type(name));
        match entry {
            Some(layout) => Ok(layout.clone()),
            None => Err(Error::LayoutMissing(name.to_string())),
        }
    }

    /// Resolve a field of a named type, trying each spelling in order.
    ///
    /// Runtime builds disagree on where some fields live; retrying alternate
    /// spellings is an ordinary branch here, not an exception handler.
    ///
    /// # Errors
    /// Returns [`Error::FieldLayout`] naming the last spelling if none matched.
    pub(crate) fn struct_field(&self, type_name: &str, names: &[&str]) -> Result<FieldLayout> {
        let layout = self.layout(type_name)?;
        for name in names {
            if let Some(field) = layout.field(name) {
                return Ok(field.clone());
            }
        }
        Err(Error::FieldLayout {
            type_name: type_name.to_string(),
            field: names.last().unwrap_or(&"").to_string(),
        })
    }

    /// Read one word-sized field of a structure at `base`.
    pub(crate) fn read_struct_field(&self, type_name: &str, base: u64, names: &[&str]) -> Result<u64> {
        let field = self.struct_field(type_name, names)?;
        self.mem().read_field(base, &field)
    }

    /// Flags word of a heap object's header.
    pub(crate) fn basic_flags(&self, raw: RawValue) -> Result<u64> {
        self.read_struct_field("struct RBasic", raw.address(), &["flags"])
    }

    /// Class of a heap object, from its header.
    pub(crate) fn klass_of(&self, raw: RawValue) -> Result<RawValue> {
        Ok(RawValue(self.read_struct_field(
            "struct RBasic",
            raw.address(),
            &["klass", "basic.klass"],
        )?))
    }

    /// ID of the hidden `__classpath__` symbol, interned once per session.
    pub(crate) fn classpath_id(&self) -> Option<u64> {
        *self
            .classpath_id
            .get_or_init(|| symbols::intern(self, "__classpath__"))
    }

    /// Determine the runtime type of a raw value.
    ///
    /// Immediates are classified from bits alone; anything else is treated as a
    /// heap pointer and its header flags are read and masked.
    ///
    /// # Errors
    /// Returns [`Error::CorruptValue`] if the header is unreadable or carries a
    /// tag outside the documented set.
    pub fn classify(&self, raw: RawValue) -> Result<TypeTag> {
        if let Some(tag) = classify_immediate(raw, &self.profile) {
            return Ok(tag);
        }

        let flags = self
            .basic_flags(raw)
            .map_err(|_| corrupt_error!("unreadable object header at {}", raw))?;
        TypeTag::from_bits(flags & RUBY_T_MASK)
            .ok_or_else(|| corrupt_error!("unknown type tag {:#x} at {}", flags & RUBY_T_MASK, raw))
    }

    /// Select the decoder for a raw value.
    ///
    /// Never fails: a value that cannot be classified decodes as
    /// [`DecodeKind::Opaque`] and renders as its address. The one ambiguity the
    /// tag cannot express, immediate flonum vs heap float, is resolved here by
    /// re-checking the flonum discriminant.
    #[must_use]
    pub fn decode(&self, raw: RawValue) -> DecodedValue {
        let kind = match self.classify(raw) {
            Ok(TypeTag::Float) => {
                if self.profile.is_flonum(raw.0) {
                    DecodeKind::Flonum
                } else {
                    DecodeKind::BoxedFloat
                }
            }
            Ok(TypeTag::Fixnum) => DecodeKind::Fixnum,
            Ok(TypeTag::Nil) => DecodeKind::Nil,
            Ok(TypeTag::True) => DecodeKind::True,
            Ok(TypeTag::False) => DecodeKind::False,
            Ok(TypeTag::Symbol) => DecodeKind::Symbol,
            Ok(TypeTag::String) => DecodeKind::String,
            Ok(TypeTag::Array) => DecodeKind::Array,
            Ok(TypeTag::Hash) => DecodeKind::Hash,
            Ok(TypeTag::Regexp) => DecodeKind::Regexp,
            Ok(TypeTag::Object) => DecodeKind::Object,
            Ok(tag @ (TypeTag::Class | TypeTag::Module | TypeTag::IClass)) => DecodeKind::Class(tag),
            Ok(TypeTag::File) => DecodeKind::File,
            Ok(TypeTag::Rational) => DecodeKind::Rational,
            Ok(TypeTag::Complex) => DecodeKind::Complex,
            Ok(
                TypeTag::Struct
                | TypeTag::Bignum
                | TypeTag::Data
                | TypeTag::Match
                | TypeTag::Undef
                | TypeTag::Node
                | TypeTag::Zombie,
            ) => DecodeKind::Opaque,
            Err(e) => {
                debug!("decoding {} as opaque: {}", raw, e);
                DecodeKind::Opaque
            }
        };

        DecodedValue { raw, kind }
    }

    /// Structured payload of a raw value; fresh traversal state per call.
    #[must_use]
    pub fn proxy(&self, raw: RawValue) -> ProxyValue {
        let mut visited = VisitedSet::new();
        self.proxy_value(&self.decode(raw), &mut visited)
    }

    /// Structured payload of a decoded value, sharing traversal state with an
    /// enclosing walk.
    ///
    /// Per-value failures degrade to [`ProxyValue::Opaque`] rather than
    /// propagating out of the traversal.
    #[must_use]
    pub fn proxy_value(&self, value: &DecodedValue, visited: &mut VisitedSet) -> ProxyValue {
        let result = match value.kind {
            DecodeKind::Fixnum => Ok(ProxyValue::Int(scalar::fixnum(value.raw))),
            DecodeKind::Flonum => Ok(ProxyValue::Float(scalar::flonum(value.raw))),
            DecodeKind::BoxedFloat => scalar::boxed_float(self, value.raw).map(ProxyValue::Float),
            DecodeKind::Nil => Ok(ProxyValue::Nil),
            DecodeKind::True => Ok(ProxyValue::Bool(true)),
            DecodeKind::False => Ok(ProxyValue::Bool(false)),
            DecodeKind::Symbol => Ok(ProxyValue::Symbol(symbols::symbol_name(self, value.raw))),
            DecodeKind::String => string::read(self, value.raw).map(ProxyValue::Str),
            DecodeKind::Array => array::proxy(self, value.raw, visited),
            DecodeKind::Hash => hash::proxy(self, value.raw, visited),
            DecodeKind::Regexp => regexp::proxy(self, value.raw, visited),
            DecodeKind::Rational => scalar::rational(self, value.raw, visited),
            DecodeKind::Complex => scalar::complex(self, value.raw, visited),
            // No structural payload; the rendering is the interface for these.
            DecodeKind::Object | DecodeKind::Class(_) | DecodeKind::File | DecodeKind::Opaque => {
                Ok(ProxyValue::opaque(value.raw))
            }
        };

        match result {
            Ok(proxy) => proxy,
            Err(e) => {
                debug!("proxy of {} degraded to opaque: {}", value.raw, e);
                ProxyValue::opaque(value.raw)
            }
        }
    }

    /// Write the display form of a decoded value into a bounded buffer.
    ///
    /// Container types insert their address into `visited` before recursing and
    /// substitute a short placeholder on re-entry. Decode failures for this value
    /// or any child degrade to the generic address fallback; only output
    /// truncation propagates.
    ///
    /// # Errors
    /// Returns [`Truncated`](crate::render::Truncated) once the output cap is hit.
    pub fn write_repr(
        &self,
        value: &DecodedValue,
        out: &mut ReprWriter,
        visited: &mut VisitedSet,
    ) -> WriteResult {
        match value.kind {
            DecodeKind::Nil => out.write("nil"),
            DecodeKind::True => out.write("true"),
            DecodeKind::False => out.write("false"),
            DecodeKind::Hash => hash::write_repr(self, value.raw, out, visited),
            DecodeKind::Object => object::write_repr(self, value.raw, out, visited),
            DecodeKind::Class(tag) => class::write_repr(self, value.raw, tag, out),
            DecodeKind::File => file::write_repr(self, value.raw, out, visited),
            _ => {
                let proxy = self.proxy_value(value, visited);
                out.write(&proxy.to_string())
            }
        }
    }

    /// Render a raw value to a display string of at most `max_len` bytes.
    ///
    /// The single entry point used by the host boundary. When the cap is reached
    /// mid-traversal, the partial output is returned with a `...(truncated)`
    /// marker appended.
    #[must_use]
    pub fn truncated_repr(&self, raw: RawValue, max_len: usize) -> String {
        let mut out = ReprWriter::bounded(max_len);
        let mut visited = VisitedSet::new();
        match self.write_repr(&self.decode(raw), &mut out, &mut visited) {
            Ok(()) => out.into_string(),
            Err(_) => {
                let mut partial = out.into_string();
                partial.push_str("...(truncated)");
                partial
            }
        }
    }
}

/// Generic fallback rendering for a value nothing could decode.
pub(crate) fn write_fallback(out: &mut ReprWriter, raw: RawValue) -> WriteResult {
    out.write(&format!("<VALUE at remote {:#x}>", raw.address()))
}
