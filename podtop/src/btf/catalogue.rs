//! Name-indexed access to the types of an instrumentation program.

use btf_rs::{Btf, BtfType, Type};
use log::debug;
use object::{Object, ObjectSection};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::descriptor::{AliasKind, IntEncoding, TypeDescriptor};
use crate::domain::{BtfError, TypeId};

/// Alias chains and array nesting deeper than this become `Unresolved`.
const MAX_RESOLVE_DEPTH: usize = 32;

/// ELF section holding the program's BTF.
const BTF_SECTION: &str = ".BTF";

/// Lookup of declared variables by name.
///
/// Implemented by [`BtfCatalogue`] for real programs and by a plain map for
/// tests and for callers that assemble descriptors themselves.
pub trait TypeCatalogue {
    /// Type descriptor of the variable `name`, if the program declares it.
    fn variable_type(&self, name: &str) -> Option<TypeDescriptor>;

    /// Every declared variable name, in declaration order.
    fn variable_names(&self) -> Vec<String>;
}

impl TypeCatalogue for HashMap<String, TypeDescriptor> {
    fn variable_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.get(name).cloned()
    }

    fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Type catalogue backed by a parsed `.BTF` section.
pub struct BtfCatalogue {
    btf: Btf,
    /// VAR name → VAR type id, first declaration wins
    vars: HashMap<String, TypeId>,
    var_order: Vec<String>,
}

impl fmt::Debug for BtfCatalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BtfCatalogue").field("vars", &self.var_order).finish_non_exhaustive()
    }
}

impl BtfCatalogue {
    /// Build a catalogue from a raw BTF blob.
    ///
    /// # Errors
    /// Returns an error if the blob is malformed
    pub fn parse(data: &[u8]) -> Result<Self, BtfError> {
        let btf = Btf::from_bytes(data).map_err(|e| BtfError::Decode(e.to_string()))?;

        // Ids are dense from 1; the first id that fails to resolve ends the table
        let mut vars = HashMap::new();
        let mut var_order = Vec::new();
        let mut id = 1;
        while let Ok(ty) = btf.resolve_type_by_id(id) {
            if let Type::Var(var) = ty {
                let name = btf.resolve_name(&var).map_err(|e| BtfError::Decode(e.to_string()))?;
                if !vars.contains_key(&name) {
                    vars.insert(name.clone(), TypeId(id));
                    var_order.push(name);
                }
            }
            id += 1;
        }

        debug!("parsed BTF: {} types, {} variables", id - 1, var_order.len());
        Ok(Self { btf, vars, var_order })
    }

    /// Build a catalogue from an ELF object's `.BTF` section.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a valid object, or
    /// carries no BTF
    pub fn from_object_file(path: impl AsRef<Path>) -> Result<Self, BtfError> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_object_bytes(&data)
    }

    /// Same as [`from_object_file`](Self::from_object_file) for in-memory objects.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a valid object or carry no BTF
    pub fn from_object_bytes(data: &[u8]) -> Result<Self, BtfError> {
        let file = object::File::parse(data)?;
        let section = file.section_by_name(BTF_SECTION).ok_or(BtfError::MissingSection)?;
        Self::parse(section.data()?)
    }

    /// Number of distinct variable names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.var_order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.var_order.is_empty()
    }

    /// Descriptor tree for the type `id`.
    #[must_use]
    pub fn descriptor(&self, id: TypeId) -> TypeDescriptor {
        match self.btf.resolve_type_by_id(id.0) {
            Ok(ty) => self.build(ty, 0),
            Err(_) => TypeDescriptor::Unresolved,
        }
    }

    fn name<T: BtfType>(&self, ty: &T) -> String {
        self.btf.resolve_name(ty).unwrap_or_default()
    }

    /// Follow the link out of `ty` (alias target, array element, var type).
    fn chained<T: BtfType>(&self, ty: &T, depth: usize) -> TypeDescriptor {
        if depth > MAX_RESOLVE_DEPTH {
            return TypeDescriptor::Unresolved;
        }
        match self.btf.resolve_chained_type(ty) {
            Ok(next) => self.build(next, depth + 1),
            Err(_) => TypeDescriptor::Unresolved,
        }
    }

    fn alias<T: BtfType>(&self, kind: AliasKind, ty: &T, depth: usize) -> TypeDescriptor {
        TypeDescriptor::Alias {
            name: self.name(ty),
            kind,
            target: Box::new(self.chained(ty, depth)),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build(&self, ty: Type, depth: usize) -> TypeDescriptor {
        match ty {
            Type::Int(int) => TypeDescriptor::Int {
                name: self.name(&int),
                encoding: IntEncoding::from_flags(int.is_signed(), int.is_char(), int.is_bool()),
                size: int.size() as u32,
            },
            Type::Float(float) => {
                TypeDescriptor::Float { name: self.name(&float), size: float.size() as u32 }
            }
            Type::Struct(st) => TypeDescriptor::Struct { name: self.name(&st) },
            Type::Union(un) => TypeDescriptor::Union { name: self.name(&un) },
            Type::Enum(en) => TypeDescriptor::Enum { name: self.name(&en) },
            Type::Enum64(en) => TypeDescriptor::Enum { name: self.name(&en) },
            Type::Array(array) => TypeDescriptor::Array {
                element: Box::new(self.chained(&array, depth)),
                len: array.len() as u32,
            },
            Type::Typedef(td) => self.alias(AliasKind::Typedef, &td, depth),
            Type::Const(c) => self.alias(AliasKind::Const, &c, depth),
            Type::Volatile(v) => self.alias(AliasKind::Volatile, &v, depth),
            Type::Restrict(r) => self.alias(AliasKind::Restrict, &r, depth),
            Type::TypeTag(tag) => self.alias(AliasKind::TypeTag, &tag, depth),
            Type::Var(var) => self.chained(&var, depth),
            Type::Ptr(_) => TypeDescriptor::Pointer,
            Type::Fwd(_) => TypeDescriptor::Other { kind: "fwd" },
            Type::Func(_) => TypeDescriptor::Other { kind: "func" },
            Type::FuncProto(_) => TypeDescriptor::Other { kind: "func_proto" },
            Type::Datasec(_) => TypeDescriptor::Other { kind: "datasec" },
            Type::DeclTag(_) => TypeDescriptor::Other { kind: "decl_tag" },
            _ => TypeDescriptor::Void,
        }
    }
}

impl TypeCatalogue for BtfCatalogue {
    fn variable_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.vars.get(name).map(|id| self.descriptor(*id))
    }

    fn variable_names(&self) -> Vec<String> {
        self.var_order.clone()
    }
}
