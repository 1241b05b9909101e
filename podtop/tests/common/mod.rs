//! BTF fixtures shared by the integration tests.
#![allow(dead_code)]

const KIND_INT: u32 = 1;
const KIND_PTR: u32 = 2;
const KIND_ARRAY: u32 = 3;
const KIND_STRUCT: u32 = 4;
const KIND_TYPEDEF: u32 = 8;
const KIND_VOLATILE: u32 = 9;
const KIND_CONST: u32 = 10;
const KIND_VAR: u32 = 14;
const KIND_FLOAT: u32 = 16;

const INT_SIGNED: u32 = 1;
const INT_CHAR: u32 = 2;

/// Minimal little-endian BTF writer for building fixtures by hand.
///
/// Every helper returns the id of the type it appended; ids start at 1.
pub struct Blob {
    types: Vec<u8>,
    strings: Vec<u8>,
    next_id: u32,
}

impl Blob {
    pub fn new() -> Self {
        Self { types: Vec::new(), strings: vec![0], next_id: 1 }
    }

    fn name(&mut self, name: &str) -> u32 {
        if name.is_empty() {
            return 0;
        }
        let offset = self.strings.len() as u32;
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);
        offset
    }

    fn push(&mut self, name: &str, kind: u32, vlen: u32, size_or_type: u32, extra: &[u32]) -> u32 {
        let name_off = self.name(name);
        for word in [name_off, (kind << 24) | vlen, size_or_type].iter().chain(extra) {
            self.types.extend_from_slice(&word.to_le_bytes());
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn int(&mut self, name: &str, size: u32, signed: bool) -> u32 {
        let encoding = if signed { INT_SIGNED } else { 0 };
        self.push(name, KIND_INT, 0, size, &[(encoding << 24) | (size * 8)])
    }

    pub fn char(&mut self) -> u32 {
        self.push("char", KIND_INT, 0, 1, &[((INT_CHAR | INT_SIGNED) << 24) | 8])
    }

    pub fn float(&mut self, name: &str, size: u32) -> u32 {
        self.push(name, KIND_FLOAT, 0, size, &[])
    }

    pub fn typedef(&mut self, name: &str, target: u32) -> u32 {
        self.push(name, KIND_TYPEDEF, 0, target, &[])
    }

    pub fn konst(&mut self, target: u32) -> u32 {
        self.push("", KIND_CONST, 0, target, &[])
    }

    pub fn volatile(&mut self, target: u32) -> u32 {
        self.push("", KIND_VOLATILE, 0, target, &[])
    }

    pub fn pointer(&mut self, target: u32) -> u32 {
        self.push("", KIND_PTR, 0, target, &[])
    }

    pub fn array(&mut self, element: u32, index: u32, len: u32) -> u32 {
        self.push("", KIND_ARRAY, 0, 0, &[element, index, len])
    }

    /// Struct without members.
    pub fn structure(&mut self, name: &str, size: u32) -> u32 {
        self.push(name, KIND_STRUCT, 0, size, &[])
    }

    /// Global variable with allocated linkage.
    pub fn var(&mut self, name: &str, ty: u32) -> u32 {
        self.push(name, KIND_VAR, 0, ty, &[1])
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xeB9Fu16.to_le_bytes());
        out.push(1); // version
        out.push(0); // flags
        for word in [24, 0, self.types.len() as u32, self.types.len() as u32, self.strings.len() as u32] {
            out.extend_from_slice(&u32::to_le_bytes(word));
        }
        out.extend_from_slice(&self.types);
        out.extend_from_slice(&self.strings);
        out
    }
}

/// `int targ_pid; char targ_comm[16];` plus their marker variables.
pub fn tcptop_btf() -> Vec<u8> {
    let mut blob = Blob::new();
    let int = blob.int("int", 4, true);
    blob.var("targ_pid", int);
    blob.var("gadget_param_targ_pid", int);
    let char_ty = blob.char();
    let index = blob.int("unsigned int", 4, false);
    let comm = blob.array(char_ty, index, 16);
    blob.var("targ_comm", comm);
    blob.var("gadget_param_targ_comm", comm);
    blob.build()
}
