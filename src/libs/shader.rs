use std::{collections::HashSet, mem, ops::Range, sync::OnceLock};

use anyhow::{anyhow, Result};
use hashlink::{LinkedHashMap, LinkedHashSet};
use regex::Regex;
use replace_with::replace_with_or_abort;
use typed_path::{Utf8UnixPath, Utf8UnixPathBuf};

use crate::core::embed::ShaderFiles;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Assembles GLSL source from embedded files, inline snippets and nested
/// builders.
///
/// `#include "path"` lines are resolved recursively, relative to the including
/// file, and every file is included at most once. Symbol renames run on the
/// assembled source, then placeholder substitutions are applied from the
/// longest key to the shortest so that no key eats into a longer one.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct ShaderBuilder {
	include_directives: LinkedHashSet<Shader>,
	renames: LinkedHashMap<String, String>,
	substitutions: LinkedHashMap<String, String>,
}

impl ShaderBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn include(&mut self, shader: impl Into<Shader>) -> &mut Self {
		self.include_directives.insert(shader.into());
		self
	}

	pub fn include_path(&mut self, path: &str) -> &mut Self {
		self.include(Utf8UnixPath::new(path).to_path_buf())
	}

	/// Replaces every whole-word occurrence of `from` with `to`.
	pub fn rename<K, V>(&mut self, from: K, to: V) -> &mut Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.renames.insert(from.into(), to.into());
		self
	}

	/// Replaces every literal occurrence of `key` with `value`.
	pub fn substitute<K, V>(&mut self, key: K, value: V) -> &mut Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.substitutions.insert(key.into(), value.into());
		self
	}

	pub fn build_source(&mut self, shader_map: &dyn ShaderFiles) -> Result<String> {
		let mut state = ShaderBuilderState::new(shader_map);
		self.build_source_from_state(&mut state)
	}

	fn build_source_from_state(&mut self, state: &mut ShaderBuilderState) -> Result<String> {
		let mut builder = mem::take(self);

		let mut source = String::new();

		for shader in builder.include_directives.drain() {
			source.push_str(&shader.build_recursively(state)?);
		}

		for (from, to) in builder.renames.iter() {
			source = rename_whole_word(&source, from, to);
		}

		Ok(builder.apply_substitutions(source))
	}

	fn apply_substitutions(&self, mut source: String) -> String {
		let mut substitutions = self.substitutions.iter().collect::<Vec<_>>();
		// From the longest key to the shortest
		substitutions.sort_by(|(key1, _), (key2, _)| key2.len().cmp(&key1.len()).then(key1.cmp(key2)));

		for (key, value) in substitutions {
			source = source.replace(key.as_str(), value);
		}
		source
	}
}

fn rename_whole_word(source: &str, from: &str, to: &str) -> String {
	match Regex::new(&format!(r"\b{}\b", regex::escape(from))) {
		Ok(re) => re.replace_all(source, regex::NoExpand(to)).into_owned(),
		Err(_) => source.to_owned(),
	}
}

fn include_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r#"(?m)^[ \t]*#include "(.+?)"[ \t]*$"#).unwrap())
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

struct ShaderBuilderState<'a> {
	pub shader_map: &'a dyn ShaderFiles,
	pub blacklist: HashSet<Shader>,
}

impl<'a> ShaderBuilderState<'a> {
	pub fn new(shader_map: &'a dyn ShaderFiles) -> Self {
		Self {
			shader_map,
			blacklist: HashSet::new(),
		}
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[derive(Hash, Debug, Clone, PartialEq, Eq)]
pub enum Shader {
	Source(String),
	Path(Utf8UnixPathBuf),
	Builder(ShaderBuilder),
}

impl Shader {
	fn root() -> Utf8UnixPathBuf {
		Utf8UnixPath::new("/").to_path_buf()
	}

	pub fn get_parent(&self) -> Utf8UnixPathBuf {
		match self {
			Shader::Path(path) => path.parent().map(|x| x.to_owned()).unwrap_or_else(Self::root),
			Shader::Source(_) | Shader::Builder(_) => Self::root(),
		}
	}

	/// Renames a symbol everywhere it appears as a whole word.
	pub fn rename_symbol(&mut self, from: &str, to: &str) {
		replace_with_or_abort(self, |self_| match self_ {
			// Replace in the source string directly
			Shader::Source(source) => Shader::Source(rename_whole_word(&source, from, to)),
			// Make the path into a ShaderBuilder instead, and add a rename directive
			Shader::Path(path) => {
				let mut builder = ShaderBuilder::new();
				builder.include(path).rename(from, to);
				Shader::Builder(builder)
			}
			// Add a rename directive to the ShaderBuilder
			Shader::Builder(mut builder) => {
				builder.rename(from, to);
				Shader::Builder(builder)
			}
		});
	}

	pub fn build_source(self, shader_map: &dyn ShaderFiles) -> Result<String> {
		ShaderBuilder::new().include(self).build_source(shader_map)
	}

	fn get_raw_source(self, state: &mut ShaderBuilderState) -> Result<String> {
		match self {
			Shader::Source(source) => Ok(source),

			Shader::Path(path) => {
				let path = Self::root().join(path).normalize();

				// Get the source from the shader map
				let source_data = state
					.shader_map
					.load(path.as_str())
					.ok_or_else(|| anyhow!("File not found: {}", path.as_str()))?;

				String::from_utf8(source_data.to_vec()).map_err(|_| anyhow!("Invalid UTF8 file: {}", path.as_str()))
			}

			Shader::Builder(mut builder) => builder.build_source_from_state(state),
		}
	}

	fn build_recursively(self, state: &mut ShaderBuilderState) -> Result<String> {
		// Check that the file wasn't already included
		if state.blacklist.contains(&self) {
			// Not an error, just includes empty source
			return Ok(String::new());
		}

		// Blacklist the shader from including it anymore
		state.blacklist.insert(self.clone());

		// The path of the current shader file
		let parent_path = self.get_parent();

		let mut source = self.get_raw_source(state)?;

		let mut byte_offset: isize = 0;
		let includes = include_regex()
			.captures_iter(&source)
			.filter_map(|caps| Some((caps.get(1)?.as_str().to_owned(), caps.get(0)?.range())))
			.collect::<Vec<(String, Range<usize>)>>();

		// Replace the include statements in the source with the actual source of each
		// file
		for (path_str, range) in includes {
			// Offset the range by byte_offset
			let range = (range.start as isize + byte_offset) as usize..(range.end as isize + byte_offset) as usize;

			// Relative paths start from the including file, absolute ones from the root
			let path_absolute = parent_path.join(path_str).normalize();

			let source_to_include = Shader::Path(path_absolute).build_recursively(state)?;

			// Get the byte-size of the file to be inserted, to shift the other insertions
			// afterwards
			byte_offset += (source_to_include.len() as isize) - (range.len() as isize);

			source.replace_range(range, &source_to_include);
		}

		Ok(source)
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

impl From<String> for Shader {
	fn from(value: String) -> Self {
		Shader::Source(value)
	}
}

impl From<&str> for Shader {
	fn from(value: &str) -> Self {
		Shader::Source(value.to_owned())
	}
}

impl From<Utf8UnixPathBuf> for Shader {
	fn from(value: Utf8UnixPathBuf) -> Self {
		Shader::Path(value)
	}
}

impl From<ShaderBuilder> for Shader {
	fn from(value: ShaderBuilder) -> Self {
		Shader::Builder(value)
	}
}

impl From<&mut ShaderBuilder> for Shader {
	fn from(value: &mut ShaderBuilder) -> Self {
		Shader::Builder(mem::take(value))
	}
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/
