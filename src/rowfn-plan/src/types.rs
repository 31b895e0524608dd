//! SQL type metadata attached to analyzed expressions

use std::fmt;

use rowfn_shared::ids::DictId;
use serde::{Deserialize, Serialize};

/// Base SQL type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlTypeKind {
    /// BOOLEAN
    Boolean,
    /// SMALLINT
    SmallInt,
    /// INTEGER
    Int,
    /// BIGINT
    BigInt,
    /// FLOAT
    Float,
    /// DOUBLE
    Double,
    /// TEXT
    Text,
    /// TIMESTAMP
    Timestamp,
    /// ARRAY of `subtype`
    Array,
}

/// Physical encoding of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Stored as-is
    #[default]
    None,
    /// Text stored as ids into a string dictionary; `comp_param` names the dictionary
    Dict,
}

/// Type of an analyzed expression
///
/// For dictionary-encoded text (or arrays of it) `comp_param` carries the
/// dictionary id, mirroring how the analyzer binds columns to dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Base type
    pub kind: SqlTypeKind,
    /// Element type for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<SqlTypeKind>,
    /// Physical encoding
    #[serde(default)]
    pub encoding: Encoding,
    /// Encoding parameter (the dictionary id for dictionary-encoded text)
    #[serde(default)]
    pub comp_param: i32,
    /// Whether NULL is allowed
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl TypeInfo {
    /// A plain, unencoded scalar type
    pub fn scalar(kind: SqlTypeKind) -> Self {
        Self {
            kind,
            subtype: None,
            encoding: Encoding::None,
            comp_param: 0,
            nullable: true,
        }
    }

    /// Unencoded TEXT
    pub fn text() -> Self {
        Self::scalar(SqlTypeKind::Text)
    }

    /// TEXT ENCODING DICT bound to `dict_id`
    pub fn text_dict(dict_id: DictId) -> Self {
        Self {
            encoding: Encoding::Dict,
            comp_param: dict_id,
            ..Self::text()
        }
    }

    /// ARRAY of TEXT ENCODING DICT bound to `dict_id`
    pub fn text_dict_array(dict_id: DictId) -> Self {
        Self {
            kind: SqlTypeKind::Array,
            subtype: Some(SqlTypeKind::Text),
            encoding: Encoding::Dict,
            comp_param: dict_id,
            nullable: true,
        }
    }

    /// ARRAY of an unencoded element type
    pub fn array_of(subtype: SqlTypeKind) -> Self {
        Self {
            kind: SqlTypeKind::Array,
            subtype: Some(subtype),
            ..Self::scalar(SqlTypeKind::Array)
        }
    }

    /// Same type with NOT NULL set
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        self.kind == SqlTypeKind::Array
    }

    /// Whether this is dictionary-encoded scalar text
    pub fn is_text_encoding_dict(&self) -> bool {
        self.kind == SqlTypeKind::Text && self.encoding == Encoding::Dict
    }

    /// Whether this is an array of dictionary-encoded text
    pub fn is_text_encoding_dict_array(&self) -> bool {
        self.is_array()
            && self.subtype == Some(SqlTypeKind::Text)
            && self.encoding == Encoding::Dict
    }

    /// Dictionary backing this type, if it is dictionary-encoded text (scalar or array)
    pub fn dict_id(&self) -> Option<DictId> {
        (self.is_text_encoding_dict() || self.is_text_encoding_dict_array())
            .then_some(self.comp_param)
    }
}

impl fmt::Display for SqlTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlTypeKind::Boolean => "BOOLEAN",
            SqlTypeKind::SmallInt => "SMALLINT",
            SqlTypeKind::Int => "INTEGER",
            SqlTypeKind::BigInt => "BIGINT",
            SqlTypeKind::Float => "FLOAT",
            SqlTypeKind::Double => "DOUBLE",
            SqlTypeKind::Text => "TEXT",
            SqlTypeKind::Timestamp => "TIMESTAMP",
            SqlTypeKind::Array => "ARRAY",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.subtype) {
            (SqlTypeKind::Array, Some(sub)) => write!(f, "{sub}[]")?,
            (kind, _) => write!(f, "{kind}")?,
        }
        if self.encoding == Encoding::Dict {
            write!(f, " ENCODING DICT({})", self.comp_param)?;
        }
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}
