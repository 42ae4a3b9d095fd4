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

//! Constructor signatures.
//!
//! A constructor whose parameters are all tagged becomes a [`Signature`]. Each
//! parameter is built into a label of its own and must agree with the member
//! label answering to the same node name: same kind, same declared type, same
//! required flag. The signature then shares that member's label.

use crate::error::{Error, SchemaError};
use crate::meta::class_def::{ClassDef, ConstructorDef};
use crate::meta::label::CacheLabel;
use crate::meta::label_factory::LabelFactory;
use crate::meta::schema::LabelSet;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Parameter {
    name: String,
    label: Arc<CacheLabel>,
}

impl Parameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member label this parameter populates.
    pub fn label(&self) -> &Arc<CacheLabel> {
        &self.label
    }
}

/// Ordered parameters of one constructor.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    pub fn is_default(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether one of the parameters populates `member`.
    pub fn accepts(&self, member: &str) -> bool {
        self.parameters.iter().any(|p| p.label.member() == member)
    }

    fn is_satisfied_by(&self, present: &HashSet<&str>) -> bool {
        self.parameters
            .iter()
            .filter(|p| p.label.is_required())
            .all(|p| present.contains(p.label.member()))
    }
}

/// All construction paths of a class.
#[derive(Clone, Debug, Default)]
pub struct Signatures {
    default: Option<Signature>,
    parameterized: Vec<Signature>,
}

impl Signatures {
    /// Builds the signatures of `def` against the member labels of its schema.
    pub fn resolve(
        def: &ClassDef,
        factory: &LabelFactory,
        labels: &LabelSet,
    ) -> Result<Signatures, SchemaError> {
        let mut signatures = Signatures::default();
        if def.constructors.is_empty() {
            signatures.default = Some(Signature::default());
        }
        for constructor in def.constructors.iter().filter(|c| c.is_tagged()) {
            if constructor.is_default() {
                signatures.default = Some(Signature::default());
            } else {
                signatures
                    .parameterized
                    .push(Self::resolve_one(def, constructor, factory, labels)?);
            }
        }
        Ok(signatures)
    }

    fn resolve_one(
        def: &ClassDef,
        constructor: &ConstructorDef,
        factory: &LabelFactory,
        labels: &LabelSet,
    ) -> Result<Signature, SchemaError> {
        let mut parameters = Vec::with_capacity(constructor.params.len());
        for param in &constructor.params {
            let Some(tag) = &param.tag else {
                continue;
            };
            let inconsistent = |reason: String| SchemaError::InconsistentParameter {
                class: def.name.clone(),
                parameter: param.name.clone(),
                reason,
            };
            let built = factory.build(&def.name, &param.name, &param.declared, tag)?;
            let member = labels
                .find(built.namespace(), built.node_name())
                .ok_or_else(|| {
                    inconsistent(format!(
                        "no {} member answers to '{}'",
                        built.namespace().as_str(),
                        built.node_name()
                    ))
                })?;
            if member.kind() != built.kind() {
                return Err(inconsistent(format!(
                    "parameter is {:?} but member '{}' is {:?}",
                    built.kind(),
                    member.member(),
                    member.kind()
                )));
            }
            if member.declared() != built.declared() {
                return Err(inconsistent(format!(
                    "parameter type '{}' differs from member '{}' of type '{}'",
                    built.declared(),
                    member.member(),
                    member.declared()
                )));
            }
            if member.is_required() != built.is_required() {
                return Err(inconsistent(format!(
                    "parameter required={} differs from member '{}' required={}",
                    built.is_required(),
                    member.member(),
                    member.is_required()
                )));
            }
            parameters.push(Parameter {
                name: param.name.clone(),
                label: member.clone(),
            });
        }
        Ok(Signature { parameters })
    }

    pub fn default_signature(&self) -> Option<&Signature> {
        self.default.as_ref()
    }

    pub fn parameterized(&self) -> &[Signature] {
        &self.parameterized
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.parameterized.is_empty()
    }

    /// Whether some parameterized signature populates `member`.
    pub fn accepts(&self, member: &str) -> bool {
        self.parameterized.iter().any(|s| s.accepts(member))
    }

    /// Picks the signature used to construct an instance from the members
    /// present in a document.
    pub fn select(
        &self,
        class: &str,
        present: &HashSet<&str>,
        read_only: &[String],
    ) -> Result<&Signature, Error> {
        let read_only: Vec<&str> = read_only
            .iter()
            .map(String::as_str)
            .filter(|m| present.contains(m))
            .collect();
        if read_only.is_empty() {
            if let Some(default) = &self.default {
                return Ok(default);
            }
        }
        self.parameterized
            .iter()
            .find(|s| s.is_satisfied_by(present) && read_only.iter().all(|m| s.accepts(m)))
            .ok_or_else(|| {
                Error::missing_value(format!(
                    "no constructor of class '{}' can be satisfied by the members present",
                    class
                ))
            })
    }
}
