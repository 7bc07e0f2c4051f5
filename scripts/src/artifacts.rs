//! Loading of contract compilation artifacts and linking of library addresses
//!
//! Both the Hardhat artifact layout (`bytecode` as a hex string alongside a top-level
//! `linkReferences` map) and the Foundry layout (`bytecode.object` with a nested
//! `bytecode.linkReferences` map) are accepted.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{hex, Address, Bytes};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::{
    constants::{ARTIFACT_EXTENSION, NUM_BYTES_ADDRESS},
    errors::ScriptError,
};

/// Library link references, keyed by source file and then by library name
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>;

/// The addresses of deployed libraries, keyed by library name
pub type Libraries = BTreeMap<String, Address>;

/// The position of a library placeholder within a contract's bytecode, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LinkOffset {
    /// The offset of the placeholder
    pub start: usize,
    /// The length of the placeholder
    pub length: usize,
}

impl LinkOffset {
    /// The range of hex characters the placeholder spans, `None` on overflow
    pub fn hex_range(&self) -> Option<(usize, usize)> {
        let start = self.start.checked_mul(2)?;
        let end = start.checked_add(self.length.checked_mul(2)?)?;
        Some((start, end))
    }
}

/// The on-disk shape of an artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// The contract name, only present in Hardhat artifacts
    #[serde(default)]
    contract_name: Option<String>,
    /// The contract ABI
    abi: Value,
    /// The creation bytecode
    bytecode: RawBytecode,
    /// The link references, only present at the top level in Hardhat artifacts
    #[serde(default)]
    link_references: LinkReferences,
}

/// The creation bytecode of an artifact in either layout
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// A bare hex string
    Hex(String),
    /// A bytecode object carrying its own link references
    Object {
        /// The hex-encoded bytecode
        object: String,
        /// The link references
        #[serde(default, rename = "linkReferences")]
        link_references: LinkReferences,
    },
}

/// A compiled contract
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The name of the contract
    pub name: String,
    /// The contract ABI
    pub abi: Value,
    /// The hex-encoded creation bytecode, without a `0x` prefix, possibly containing
    /// library placeholders
    bytecode: String,
    /// The positions of the library placeholders in the bytecode
    link_references: LinkReferences,
}

impl Artifact {
    /// Parse an artifact from its JSON representation, using `name` when the
    /// artifact does not carry a contract name
    pub fn from_json(name: &str, json: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact =
            serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        let (bytecode, nested_references) = match raw.bytecode {
            RawBytecode::Hex(code) => (code, LinkReferences::new()),
            RawBytecode::Object {
                object,
                link_references,
            } => (object, link_references),
        };

        let bytecode = bytecode.strip_prefix("0x").unwrap_or(&bytecode).to_string();
        if !bytecode.is_ascii() {
            return Err(ScriptError::ArtifactParsing(format!(
                "bytecode of {} is not hex",
                name
            )));
        }

        let mut link_references = raw.link_references;
        link_references.extend(nested_references);

        Ok(Self {
            name: raw.contract_name.unwrap_or_else(|| name.to_string()),
            abi: raw.abi,
            bytecode,
            link_references,
        })
    }

    /// The names of the libraries this contract must be linked against
    pub fn required_libraries(&self) -> BTreeSet<&str> {
        self.link_references
            .values()
            .flat_map(|libs| libs.keys().map(String::as_str))
            .collect()
    }

    /// Splice the given library addresses into the bytecode
    ///
    /// Libraries are matched either by bare name or by `source:name`. Fails if a
    /// referenced library has no address or if any placeholder is left unresolved.
    pub fn link(&self, libraries: &Libraries) -> Result<Bytes, ScriptError> {
        let mut code = self.bytecode.clone();
        let mut used = BTreeSet::new();

        for (source, libs) in &self.link_references {
            for (lib, offsets) in libs {
                let qualified = format!("{}:{}", source, lib);
                let (key, address) = libraries
                    .get_key_value(lib)
                    .or_else(|| libraries.get_key_value(&qualified))
                    .ok_or_else(|| {
                        ScriptError::Linking(format!(
                            "{} requires library {} but no address was given",
                            self.name, qualified
                        ))
                    })?;
                used.insert(key.as_str());

                let address_hex = hex::encode(address);
                for offset in offsets {
                    if offset.length != NUM_BYTES_ADDRESS {
                        return Err(ScriptError::Linking(format!(
                            "link reference for {} in {} spans {} bytes",
                            lib, self.name, offset.length
                        )));
                    }

                    let (start, end) = offset
                        .hex_range()
                        .filter(|(_, end)| *end <= code.len())
                        .ok_or_else(|| {
                            ScriptError::Linking(format!(
                                "link reference for {} lies outside the bytecode of {}",
                                lib, self.name
                            ))
                        })?;

                    code.replace_range(start..end, &address_hex);
                }
            }
        }

        for name in libraries.keys().filter(|name| !used.contains(name.as_str())) {
            warn!("library {} is not referenced by {}, ignoring it", name, self.name);
        }

        if code.contains("__") {
            return Err(ScriptError::Linking(format!(
                "{} contains unresolved library placeholders",
                self.name
            )));
        }

        hex::decode(&code)
            .map(Bytes::from)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", self.name, e)))
    }

    /// Build the init code of a deployment: the linked bytecode followed by the
    /// ABI-encoded constructor arguments
    pub fn init_code(
        &self,
        libraries: &Libraries,
        constructor_args: &[u8],
    ) -> Result<Bytes, ScriptError> {
        if self.bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} has no creation bytecode, is it abstract or an interface?",
                self.name
            )));
        }

        let linked = self.link(libraries)?;
        Ok([&linked[..], constructor_args].concat().into())
    }
}

/// A directory tree of compilation artifacts, looked up by contract name
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts tree
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the artifact of the named contract
    pub fn load(&self, name: &str) -> Result<Artifact, ScriptError> {
        let file_name = format!("{}.{}", name, ARTIFACT_EXTENSION);
        let path = find_file(&self.root, &file_name)?.ok_or_else(|| {
            ScriptError::ReadFile(format!(
                "no artifact named {} under {}",
                file_name,
                self.root.display()
            ))
        })?;

        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;

        Artifact::from_json(name, &contents)
    }
}

/// Depth-first search for a file with the given name, visiting entries in sorted order
fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, ScriptError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", dir.display(), e)))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if let Some(found) = find_file(&path, file_name)? {
                return Ok(Some(found));
            }
        } else if path.file_name().is_some_and(|f| f == file_name) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}
