// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::types::PrimitiveKind;
use chrono::{NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A scalar value stored in the heap.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

macro_rules! impl_primitive_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Primitive {
            #[inline(always)]
            fn from(value: $ty) -> Self {
                Primitive::$variant(value)
            }
        }
    };
}

impl_primitive_from!(bool, Bool);
impl_primitive_from!(char, Char);
impl_primitive_from!(i8, Byte);
impl_primitive_from!(i16, Short);
impl_primitive_from!(i32, Int);
impl_primitive_from!(i64, Long);
impl_primitive_from!(f32, Float);
impl_primitive_from!(f64, Double);
impl_primitive_from!(String, String);
impl_primitive_from!(NaiveDate, Date);
impl_primitive_from!(NaiveDateTime, DateTime);

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::String(value.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(kind: PrimitiveKind, text: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    text.trim().parse::<T>().map_err(|e| {
        Error::invalid_data(format!(
            "can not read '{}' as {}: {}",
            text,
            kind.name(),
            e
        ))
    })
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Bool(_) => PrimitiveKind::Bool,
            Primitive::Char(_) => PrimitiveKind::Char,
            Primitive::Byte(_) => PrimitiveKind::Byte,
            Primitive::Short(_) => PrimitiveKind::Short,
            Primitive::Int(_) => PrimitiveKind::Int,
            Primitive::Long(_) => PrimitiveKind::Long,
            Primitive::Float(_) => PrimitiveKind::Float,
            Primitive::Double(_) => PrimitiveKind::Double,
            Primitive::String(_) => PrimitiveKind::String,
            Primitive::Date(_) => PrimitiveKind::Date,
            Primitive::DateTime(_) => PrimitiveKind::DateTime,
        }
    }

    /// Text form written to attributes and element content.
    pub fn to_text(&self) -> String {
        match self {
            Primitive::Bool(v) => v.to_string(),
            Primitive::Char(v) => v.to_string(),
            Primitive::Byte(v) => v.to_string(),
            Primitive::Short(v) => v.to_string(),
            Primitive::Int(v) => v.to_string(),
            Primitive::Long(v) => v.to_string(),
            Primitive::Float(v) => v.to_string(),
            Primitive::Double(v) => v.to_string(),
            Primitive::String(v) => v.clone(),
            Primitive::Date(v) => v.format(DATE_FORMAT).to_string(),
            Primitive::DateTime(v) => v.format(DATETIME_FORMAT).to_string(),
        }
    }

    /// Reads the text form of `kind`. Strings are taken verbatim, everything
    /// else ignores surrounding whitespace.
    pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Primitive, Error> {
        Ok(match kind {
            PrimitiveKind::Bool => match text.trim() {
                "true" => Primitive::Bool(true),
                "false" => Primitive::Bool(false),
                other => {
                    return Err(Error::invalid_data(format!(
                        "can not read '{}' as boolean",
                        other
                    )))
                }
            },
            PrimitiveKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Primitive::Char(c),
                    _ => {
                        return Err(Error::invalid_data(format!(
                            "can not read '{}' as char",
                            text
                        )))
                    }
                }
            }
            PrimitiveKind::Byte => Primitive::Byte(parse_number(kind, text)?),
            PrimitiveKind::Short => Primitive::Short(parse_number(kind, text)?),
            PrimitiveKind::Int => Primitive::Int(parse_number(kind, text)?),
            PrimitiveKind::Long => Primitive::Long(parse_number(kind, text)?),
            PrimitiveKind::Float => Primitive::Float(parse_number(kind, text)?),
            PrimitiveKind::Double => Primitive::Double(parse_number(kind, text)?),
            PrimitiveKind::String => Primitive::String(text.to_string()),
            PrimitiveKind::Date => Primitive::Date(
                NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
                    Error::invalid_data(format!("can not read '{}' as date: {}", text, e))
                })?,
            ),
            PrimitiveKind::DateTime => Primitive::DateTime(
                NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT).map_err(|e| {
                    Error::invalid_data(format!("can not read '{}' as datetime: {}", text, e))
                })?,
            ),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integral value of any of the integer kinds.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Primitive::Byte(v) => Some(v as i64),
            Primitive::Short(v) => Some(v as i64),
            Primitive::Int(v) => Some(v as i64),
            Primitive::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Primitive::Float(v) => Some(v as f64),
            Primitive::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Primitive::Bool(v) => Some(v),
            _ => None,
        }
    }
}
