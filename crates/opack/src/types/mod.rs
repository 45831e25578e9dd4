// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptions and canonical type naming.

mod info;
mod names;

pub use info::{TypeInfo, TypeInfoBuilder, TypeToken};
pub use names::{TypeNameResolver, TypeNameTuple, IGNORED_ASSEMBLIES};
