//! Ordered class-name lists.
//!
//! A class's YOLO index is its position in the list. Lists come from the
//! command line directly, from a `classes.txt`-style file (one name per
//! line), or from an Ultralytics `data.yaml` with a `names:` key.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::YoloprepError;

/// An ordered list of class names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    /// Builds a list from explicit names, trimming entries and dropping
    /// empty ones (a stray `a,,b` on the command line yields two names).
    pub fn from_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Loads a list from a file.
    ///
    /// `.yaml`/`.yml` files parse as an Ultralytics `data.yaml` (`names:`
    /// as a sequence or an index mapping); anything else is read as a
    /// `classes.txt`-style file, one name per line.
    pub fn from_file(path: &Path) -> Result<Self, YoloprepError> {
        if has_yaml_extension(path) {
            read_data_yaml_names(path)
        } else {
            read_classes_txt(path)
        }
    }

    /// Returns a class's index, matching the first occurrence of `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the display label for a class index, falling back to
    /// `class_{index}` when the index is not covered by this list.
    pub fn label_for(&self, index: usize) -> String {
        match self.get(index) {
            Some(name) => name.to_string(),
            None => format!("class_{}", index),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

fn read_data_yaml_names(path: &Path) -> Result<ClassNames, YoloprepError> {
    let data = fs::read_to_string(path).map_err(YoloprepError::Io)?;
    let parsed: DataYaml =
        serde_yaml::from_str(&data).map_err(|source| YoloprepError::DataYamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    let names = match parsed.names {
        DataYamlNames::Sequence(names) => names,
        DataYamlNames::Mapping(mapping) => {
            if mapping.is_empty() {
                Vec::new()
            } else {
                let max_index = *mapping.keys().max().expect("checked non-empty");
                let mut names = vec![String::new(); max_index + 1];
                for (index, name) in mapping {
                    names[index] = name;
                }
                for (index, name) in names.iter_mut().enumerate() {
                    if name.trim().is_empty() {
                        *name = format!("class_{}", index);
                    }
                }
                names
            }
        }
    };

    Ok(ClassNames { names })
}

fn read_classes_txt(path: &Path) -> Result<ClassNames, YoloprepError> {
    let data = fs::read_to_string(path).map_err(YoloprepError::Io)?;
    let mut names = Vec::new();

    for (line_idx, line) in data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(YoloprepError::ClassNamesInvalid {
                path: path.to_path_buf(),
                message: format!("line {} is empty", line_idx + 1),
            });
        }
        names.push(trimmed.to_string());
    }

    Ok(ClassNames { names })
}

fn has_yaml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}
