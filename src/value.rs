// ABOUTME: Runtime value types shared by the evaluator and built-ins

use crate::ast::Statement;
use crate::env::Environment;
use crate::error::SonarError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type BuiltinFn = fn(&[Value]) -> Result<Value, SonarError>;

/// A registered native function: a name (used by `type`/printing) plus the
/// Rust function implementing it.
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[derive(Debug)]
pub struct FunctionValue {
    pub parameters: Vec<String>,
    pub body: Statement,
    pub env: Rc<Environment>,
}

/// A map key: the kind tag plus a 64-bit payload hash, matching the
/// hashable kinds (Integer, Float, Boolean, String).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    kind: u8,
    hash: u64,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<HashMap<HashKey, (Value, Value)>>>),
    Function(Rc<FunctionValue>),
    Builtin(&'static Builtin),
    Return(Box<Value>),
    Break,
    Continue,
    Error(Box<SonarError>),
}

/// Scalars compare by value. Array/Map/Function/Builtin are reference-like
/// (spec.md §3 invariant iv): two separately-built containers are never
/// `==` here even with identical contents — that elementwise comparison is
/// the language-level `==` operator, implemented separately in `eval`'s
/// infix dispatch, not this Rust-level equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => std::ptr::eq(*a, *b),
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Break, Value::Break) => true,
            (Value::Continue, Value::Continue) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::from(s.into()))
    }

    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn map(pairs: HashMap<HashKey, (Value, Value)>) -> Value {
        Value::Map(Rc::new(RefCell::new(pairs)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "MAP",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN",
            Value::Break => "BREAK",
            Value::Continue => "CONTINUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// Truthiness: Null and false are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_hashable(&self) -> bool {
        self.hash_key().is_some()
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(i) => Some(HashKey {
                kind: 0,
                hash: *i as u64,
            }),
            Value::Float(f) => Some(HashKey {
                kind: 1,
                hash: f.to_bits(),
            }),
            Value::Boolean(b) => Some(HashKey {
                kind: 2,
                hash: if *b { 1 } else { 0 },
            }),
            Value::String(s) => Some(HashKey {
                kind: 3,
                hash: fnv1a(s.as_bytes()),
            }),
            _ => None,
        }
    }

    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::String(_) | Value::Array(_) | Value::Map(_))
    }

    /// Canonical unquoted representation, used for top-level `print` output
    /// of non-string values and for comparisons.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(items) => {
                let items = items.borrow();
                let parts: Vec<String> = items.iter().map(Value::formatted_inspect).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(pairs) => {
                let pairs = pairs.borrow();
                let mut parts: Vec<String> = pairs
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.formatted_inspect(), v.formatted_inspect()))
                    .collect();
                parts.sort();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Function(_) => "<function>".to_string(),
            Value::Builtin(b) => format!("<builtin: {}>", b.name),
            Value::Return(v) => v.inspect(),
            Value::Break => "<break>".to_string(),
            Value::Continue => "<continue>".to_string(),
            Value::Error(e) => format!("{}: {}", e.kind_name(), e.message()),
        }
    }

    /// Representation used when nested inside an array/map (or by `print`
    /// for its top-level arguments): strings are single-quoted.
    pub fn formatted_inspect(&self) -> String {
        match self {
            Value::String(s) => format!("'{}'", s),
            other => other.inspect(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}
