//! # Schema Model
//!
//! The immutable catalog of structs and functions a session encodes against.
//!
//! ## Invariants
//! - Struct names and function names are unique.
//! - Field names are unique within a struct; argument names are unique within a function.
//! - Every user type named by a field, argument or return type resolves to a declared struct.
//! - No struct has a field whose type is the struct itself. Longer cycles are not rejected.
//!
//! A `Schema` can only be obtained through [`Schema::new`] (or the parser, which calls it), so
//! every instance upholds these invariants. It has no mutating methods.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

/// The five primitive wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Int32,
    Int64,
    Uint32,
    Uint64,
    String,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Int32,
        Builtin::Int64,
        Builtin::Uint32,
        Builtin::Uint64,
        Builtin::String,
    ];

    /// The schema keyword for this type.
    pub const fn keyword(self) -> &'static str {
        match self {
            Builtin::Int32 => "int32",
            Builtin::Int64 => "int64",
            Builtin::Uint32 => "uint32",
            Builtin::Uint64 => "uint64",
            Builtin::String => "string",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.keyword() == word)
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self, Builtin::String)
    }
}

/// A field, argument or return type: either a builtin or the name of a declared struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(Builtin),
    User(String),
}

impl Type {
    pub fn user(name: impl Into<String>) -> Self {
        Type::User(name.into())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Type::Builtin(_))
    }

    /// The struct name, for user types.
    pub fn user_name(&self) -> Option<&str> {
        match self {
            Type::User(name) => Some(name),
            Type::Builtin(_) => None,
        }
    }
}

impl From<Builtin> for Type {
    fn from(b: Builtin) -> Self {
        Type::Builtin(b)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Builtin(b) => f.write_str(b.keyword()),
            Type::User(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Function arguments have the same shape as struct fields.
pub type Arg = Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: String,
    /// Declaration order; this is the wire order.
    pub fields: Vec<Field>,
}

impl Struct {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    /// Declaration order; this is the wire order.
    pub args: Vec<Arg>,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: impl Into<Type>, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            args,
        }
    }

    pub fn arg(&self, name: &str) -> Option<&Arg> {
        self.args.iter().find(|a| a.name == name)
    }
}

/// Reasons a schema is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The text does not follow the schema grammar.
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    DuplicateStruct(String),
    DuplicateFunction(String),
    DuplicateField { owner: String, field: String },
    DuplicateArgument { owner: String, arg: String },
    /// A user type does not name any declared struct.
    UnknownType { name: String, context: String },
    /// A struct has a field of its own type.
    SelfReference { name: String, field: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Syntax { line, column, message } => {
                write!(f, "schema syntax error at {}:{}: {}", line, column, message)
            }
            SchemaError::DuplicateStruct(name) => write!(f, "duplicate struct '{}'", name),
            SchemaError::DuplicateFunction(name) => write!(f, "duplicate function '{}'", name),
            SchemaError::DuplicateField { owner, field } => {
                write!(f, "duplicate field '{}' in struct '{}'", field, owner)
            }
            SchemaError::DuplicateArgument { owner, arg } => {
                write!(f, "duplicate argument '{}' in function '{}'", arg, owner)
            }
            SchemaError::UnknownType { name, context } => {
                write!(f, "unknown type '{}' in {}", name, context)
            }
            SchemaError::SelfReference { name, field } => {
                write!(f, "struct '{}' contains itself through field '{}'", name, field)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A validated, read-only set of struct and function declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    structs: BTreeMap<String, Struct>,
    functions: BTreeMap<String, Function>,
}

impl Schema {
    /// Builds a schema from declarations, checking every invariant listed in the module docs.
    pub fn new(
        structs: impl IntoIterator<Item = Struct>,
        functions: impl IntoIterator<Item = Function>,
    ) -> Result<Self, SchemaError> {
        let mut schema = Schema::default();

        for st in structs {
            ensure_unique(&st.fields, |field| SchemaError::DuplicateField {
                owner: st.name.clone(),
                field: field.to_string(),
            })?;
            if schema.structs.contains_key(&st.name) {
                return Err(SchemaError::DuplicateStruct(st.name));
            }
            schema.structs.insert(st.name.clone(), st);
        }

        for func in functions {
            ensure_unique(&func.args, |arg| SchemaError::DuplicateArgument {
                owner: func.name.clone(),
                arg: arg.to_string(),
            })?;
            if schema.functions.contains_key(&func.name) {
                return Err(SchemaError::DuplicateFunction(func.name));
            }
            schema.functions.insert(func.name.clone(), func);
        }

        schema.check_references()?;
        Ok(schema)
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        for st in self.structs.values() {
            for field in &st.fields {
                self.check_type(&field.ty, || format!("struct '{}'", st.name))?;
                if field.ty.user_name() == Some(st.name.as_str()) {
                    return Err(SchemaError::SelfReference {
                        name: st.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        for func in self.functions.values() {
            self.check_type(&func.return_type, || format!("function return '{}'", func.name))?;
            for arg in &func.args {
                self.check_type(&arg.ty, || format!("function arg '{}.{}'", func.name, arg.name))?;
            }
        }
        Ok(())
    }

    fn check_type(&self, ty: &Type, context: impl FnOnce() -> String) -> Result<(), SchemaError> {
        match ty {
            Type::User(name) if !self.structs.contains_key(name) => Err(SchemaError::UnknownType {
                name: name.clone(),
                context: context(),
            }),
            _ => Ok(()),
        }
    }

    pub fn find_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.get(name)
    }

    pub fn find_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Structs in name order.
    pub fn structs(&self) -> impl Iterator<Item = &Struct> {
        self.structs.values()
    }

    /// Functions in name order.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }
}

fn ensure_unique(
    fields: &[Field],
    err: impl FnOnce(&str) -> SchemaError,
) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(err(&field.name));
        }
    }
    Ok(())
}
