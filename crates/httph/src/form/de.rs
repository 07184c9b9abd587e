//! Weakly typed `serde` deserializer over [`FormValues`]

use serde::de::{
    self,
    value::{MapDeserializer, SeqDeserializer},
    Deserialize, IntoDeserializer, Visitor,
};

use super::FormValues;
use crate::error::DecodeError;

/// Decodes form values into `T`.
///
/// Struct fields are matched against form keys exactly, then ignoring ASCII
/// case; keys with no matching field are ignored. Values are coerced weakly:
///
/// - strings are taken as is
/// - `bool` fields accept `true` and `false`
/// - integer fields parse the value
/// - sequence fields take every submitted value in order; a single value
///   becomes a one-element sequence
///
/// A field with no submitted value gets its zero value: `""`, `0`, `false`,
/// an empty sequence or `None`. An empty value does the same for `bool` and
/// integer fields.
pub fn from_form_values<'de, T>(values: &'de FormValues) -> Result<T, DecodeError>
where
    T: Deserialize<'de>,
{
    T::deserialize(FormDeserializer { values })
}

struct FormDeserializer<'de> {
    values: &'de FormValues,
}

impl<'de> de::Deserializer<'de> for FormDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let entries = self
            .values
            .iter()
            .map(|(key, values)| (key, ValueDeserializer::new(key, values)));
        visitor.visit_map(MapDeserializer::new(entries))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let values = self.values;
        let entries = fields.iter().map(move |&field| {
            let key: &'de str = field;
            let submitted = values.lookup_field(key).unwrap_or_default();
            (key, ValueDeserializer::new(key, submitted))
        });
        visitor.visit_map(MapDeserializer::new(entries))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple tuple_struct enum
        identifier ignored_any
    }
}

/// The values submitted for one field; empty when the field is missing.
struct ValueDeserializer<'de> {
    field: String,
    values: &'de [String],
}

impl<'de> ValueDeserializer<'de> {
    fn new(field: &str, values: &'de [String]) -> Self {
        Self {
            field: field.to_string(),
            values,
        }
    }

    fn scalar(&self, target: &'static str) -> Result<&'de str, DecodeError> {
        match self.values {
            [] => Ok(""),
            [value] => Ok(value.as_str()),
            values => Err(DecodeError::field(
                &self.field,
                target,
                format_args!("expected a single value, got {}", values.len()),
            )),
        }
    }

    fn elements(self) -> impl Iterator<Item = ValueDeserializer<'de>> {
        let field = self.field;
        self.values
            .iter()
            .enumerate()
            .map(move |(index, value)| ValueDeserializer {
                field: format!("{field}[{index}]"),
                values: std::slice::from_ref(value),
            })
    }
}

macro_rules! deserialize_parsed {
    ($de:lifetime; $($method:ident => $visit:ident($ty:ty, $target:literal);)*) => {
        $(
            fn $method<V: Visitor<$de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                let raw = self.scalar($target)?;
                if raw.is_empty() {
                    return visitor.$visit(<$ty>::default());
                }
                let parsed = raw
                    .parse::<$ty>()
                    .map_err(|err| DecodeError::field(&self.field, $target, err))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let values = self.values;
        match values {
            [] => visitor.visit_unit(),
            [value] => visitor.visit_borrowed_str(value),
            _ => visitor.visit_seq(SeqDeserializer::new(self.elements())),
        }
    }

    deserialize_parsed! {
        'de;
        deserialize_bool => visit_bool(bool, "bool");
        deserialize_i8 => visit_i8(i8, "int");
        deserialize_i16 => visit_i16(i16, "int");
        deserialize_i32 => visit_i32(i32, "int");
        deserialize_i64 => visit_i64(i64, "int");
        deserialize_i128 => visit_i128(i128, "int");
        deserialize_u8 => visit_u8(u8, "uint");
        deserialize_u16 => visit_u16(u16, "uint");
        deserialize_u32 => visit_u32(u32, "uint");
        deserialize_u64 => visit_u64(u64, "uint");
        deserialize_u128 => visit_u128(u128, "uint");
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_borrowed_str(self.scalar("string")?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.values.is_empty() {
            return visitor.visit_none();
        }
        visitor.visit_some(self)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.values.is_empty() {
            let entries = std::iter::empty::<(&'de str, ValueDeserializer<'de>)>();
            return visitor.visit_map(MapDeserializer::new(entries));
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.values.is_empty() {
            return visitor.visit_f32(0.0);
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.values.is_empty() {
            return visitor.visit_f64(0.0);
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_seq(SeqDeserializer::new(self.elements()))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        char bytes byte_buf unit unit_struct struct tuple_struct enum identifier
    }
}

impl<'de> IntoDeserializer<'de, DecodeError> for ValueDeserializer<'de> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}
