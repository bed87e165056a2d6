use std::sync::OnceLock;

use anyhow::Result;
use hashlink::{LinkedHashMap, LinkedHashSet};
use log::{trace, warn};
use regex::{Captures, Regex};

use super::{blend::BlendFunction, Effect, EffectAttributes, EffectShader};
use crate::{
	core::{embed::ShaderAssets, material::Extension},
	error::MergeError,
	libs::{shader::Shader, uniform::Uniform},
};

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// The places in the effect material templates where merged code goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Section {
	FragmentHead,
	FragmentMainUv,
	FragmentMainImage,
	VertexHead,
	VertexMainSupport,
}

impl Section {
	pub const ALL: [Section; 5] = [
		Section::FragmentHead,
		Section::FragmentMainUv,
		Section::FragmentMainImage,
		Section::VertexHead,
		Section::VertexMainSupport,
	];

	/// The marker the templates contain in place of this section.
	#[rustfmt::skip]
	pub fn placeholder(&self) -> &'static str {
		match self {
			Section::FragmentHead      => "FRAGMENT_HEAD",
			Section::FragmentMainUv    => "FRAGMENT_MAIN_UV",
			Section::FragmentMainImage => "FRAGMENT_MAIN_IMAGE",
			Section::VertexHead        => "VERTEX_HEAD",
			Section::VertexMainSupport => "VERTEX_MAIN_SUPPORT",
		}
	}
}

pub type ShaderSections = LinkedHashMap<Section, String>;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

fn function_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"\w+\s+(\w+)\([\w\s,]*\)\s*\{").unwrap())
}

fn varying_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"varying\s+\w+\s+(\w*)").unwrap())
}

fn depth_parameter_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"mainImage\s*\([^)]*\bdepth\b[^)]*\)").unwrap())
}

fn support_uv_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"mainSupport\s*\([\w\s]*?\buv\s*\)").unwrap())
}

/// The first capture group of every match.
pub fn find_substrings(regex: &Regex, source: &str) -> Vec<String> {
	regex
		.captures_iter(source)
		.filter_map(|caps| caps.get(1))
		.map(|m| m.as_str().to_owned())
		.filter(|name| !name.is_empty())
		.collect()
}

/// Names of the functions a shader declares. Control flow like `else if (a) {`
/// looks the same to the pattern and is filtered out.
fn find_functions(source: &str) -> Vec<String> {
	find_substrings(function_regex(), source)
		.into_iter()
		.filter(|name| !matches!(name.as_str(), "if" | "for" | "while" | "switch"))
		.collect()
}

/// `prefix` followed by `name` with its first letter capitalised.
pub fn prefixed_name(prefix: &str, name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => format!("{}{}{}", prefix, first.to_uppercase(), chars.as_str()),
		None => prefix.to_owned(),
	}
}

/// Renames every whole-word occurrence of each name to its prefixed version,
/// except where it follows a `.` and is therefore a member access.
pub fn prefix_substrings<S: AsRef<str>>(prefix: &str, names: &[S], source: &str) -> String {
	let mut source = source.to_owned();

	for name in names {
		let name = name.as_ref();
		let Ok(regex) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) else {
			continue;
		};
		let prefixed = prefixed_name(prefix, name);

		source = regex
			.replace_all(&source, |caps: &Captures| match caps.get(0) {
				Some(m) if source[..m.start()].ends_with('.') => m.as_str().to_owned(),
				_ => prefixed.clone(),
			})
			.into_owned();
	}

	source
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Everything the merge of a list of effects produced.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedShader {
	pub sections: ShaderSections,
	pub defines: LinkedHashMap<String, String>,
	pub uniforms: LinkedHashMap<String, Uniform>,
	pub extensions: LinkedHashSet<Extension>,
	/// Blend functions in order of first use.
	pub blend_functions: LinkedHashSet<BlendFunction>,
	pub attributes: EffectAttributes,
	/// How many effects made it into the shader.
	pub integrated: usize,
	pub varying_count: usize,
	pub read_depth: bool,
	pub transformed_uv: bool,
}

impl MergedShader {
	pub fn new() -> Self {
		Self {
			sections: Section::ALL.iter().map(|section| (*section, String::new())).collect(),
			defines: LinkedHashMap::new(),
			uniforms: LinkedHashMap::new(),
			extensions: LinkedHashSet::new(),
			blend_functions: LinkedHashSet::new(),
			attributes: EffectAttributes::NONE,
			integrated: 0,
			varying_count: 0,
			read_depth: false,
			transformed_uv: false,
		}
	}

	pub fn section(&self, section: Section) -> &str {
		self.sections.get(&section).map(String::as_str).unwrap_or_default()
	}

	pub fn uniform_count(&self) -> usize {
		self.uniforms.len()
	}

	pub fn skip_rendering(&self) -> bool {
		self.integrated == 0
	}

	pub fn needs_depth_texture(&self) -> bool {
		self.attributes.contains(EffectAttributes::DEPTH)
	}

	fn append(&mut self, section: Section, code: &str) {
		self.sections.entry(section).or_insert_with(String::new).push_str(code);
	}

	fn prepend(&mut self, section: Section, code: &str) {
		let existing = self.sections.entry(section).or_insert_with(String::new);
		existing.insert_str(0, code);
	}
}

impl Default for MergedShader {
	fn default() -> Self {
		Self::new()
	}
}

/// What integrating a single effect found out about it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegrationResult {
	pub varyings: Vec<String>,
	pub transformed_uv: bool,
	pub read_depth: bool,
}

/// Prefixes the symbols of one effect and splices its code into the merged
/// sections.
///
/// Returns `None` if the effect can't be part of this merge and was left out.
pub fn integrate_effect(
	prefix: &str,
	shader: &EffectShader,
	merged: &mut MergedShader,
) -> Result<Option<IntegrationResult>, MergeError> {
	let fragment = shader.fragment_shader();
	let attributes = merged.attributes | shader.attributes();

	let main_image = fragment.contains("mainImage");
	let main_uv = fragment.contains("mainUv");

	if !main_image && !main_uv {
		return Err(MergeError::MissingMainFunction {
			effect: shader.name().to_owned(),
		});
	}

	if main_uv && attributes.contains(EffectAttributes::CONVOLUTION) {
		warn!(
			"Effect '{}' transforms UV coordinates, which is incompatible with convolution effects, leaving it out",
			shader.name()
		);
		return Ok(None);
	}

	let mut result = IntegrationResult::default();
	let mut vertex_names = Vec::new();

	if main_uv {
		merged.append(Section::FragmentMainUv, &format!("\t{}MainUv(UV);\n", prefix));
		result.transformed_uv = true;
	}

	if let Some(vertex) = shader.vertex_shader().filter(|v| v.contains("mainSupport")) {
		let argument = if support_uv_regex().is_match(vertex) { "vUv" } else { "" };
		merged.append(
			Section::VertexMainSupport,
			&format!("\t{}MainSupport({});\n", prefix, argument),
		);

		result.varyings = find_substrings(varying_regex(), vertex);
		vertex_names = velcro::vec![..result.varyings.iter().cloned(), ..find_functions(vertex)];
	}

	// Deduplicated, in order of appearance
	let names = velcro::iter![
		..vertex_names,
		..find_functions(fragment),
		..shader.uniforms().keys().cloned(),
		..shader.defines().keys().cloned()
	]
	.collect::<LinkedHashSet<String>>()
	.into_iter()
	.collect::<Vec<_>>();

	trace!("Integrating effect '{}' as '{}', renaming {:?}", shader.name(), prefix, names);

	for (key, uniform) in shader.uniforms() {
		merged.uniforms.insert(prefixed_name(prefix, key), uniform.clone());
	}

	for (key, value) in shader.defines() {
		merged
			.defines
			.insert(prefixed_name(prefix, key), prefix_substrings(prefix, &names, value));
	}

	let blend_function = shader.blend_mode().blend_function;

	if main_image {
		merged.blend_functions.insert(blend_function);

		let mut call = format!("{}MainImage(color0, UV, ", prefix);

		if attributes.contains(EffectAttributes::DEPTH) {
			if depth_parameter_regex().is_match(fragment) {
				call.push_str("depth, ");
				result.read_depth = true;
			} else if fragment.contains("readDepth(") {
				result.read_depth = true;
			}
		}

		let blend_opacity = format!("{}BlendOpacity", prefix);
		call.push_str(&format!(
			"color1);\n\tcolor0 = blend{}(color0, color1, {});\n\n\t",
			blend_function.id(),
			blend_opacity
		));

		merged
			.uniforms
			.insert(blend_opacity.clone(), shader.blend_mode().opacity.clone());
		merged.append(Section::FragmentMainImage, &call);
		merged.append(Section::FragmentHead, &format!("uniform float {};\n\n", blend_opacity));
	}

	let fragment = prefix_substrings(prefix, &names, fragment);
	merged.append(Section::FragmentHead, &format!("{}\n", fragment));

	if let Some(vertex) = shader.vertex_shader() {
		let vertex = prefix_substrings(prefix, &names, vertex);
		merged.append(Section::VertexHead, &format!("{}\n", vertex));
	}

	Ok(Some(result))
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Merges effects, in the given order, into the sections of one shader.
///
/// Effects blended with [`BlendFunction::Skip`] are left out. A second
/// convolution effect is a [`MergeError::ConvolutionConflict`].
pub fn merge(effects: &[Box<dyn Effect>]) -> Result<MergedShader> {
	let mut merged = MergedShader::new();
	let mut convolution: Option<&str> = None;

	for effect in effects {
		let shader = effect.shader();
		let attributes = shader.attributes();

		if shader.blend_mode().blend_function == BlendFunction::Skip {
			// Skipped effects may still read depth in their own update
			merged.attributes |= attributes & EffectAttributes::DEPTH;
			continue;
		}

		if attributes.contains(EffectAttributes::CONVOLUTION) {
			if let Some(integrated) = convolution {
				return Err(MergeError::ConvolutionConflict {
					effect: shader.name().to_owned(),
					integrated: integrated.to_owned(),
				}
				.into());
			}
		}

		let prefix = format!("e{}", merged.integrated);
		let Some(result) = integrate_effect(&prefix, shader, &mut merged)? else {
			continue;
		};

		if attributes.contains(EffectAttributes::CONVOLUTION) {
			convolution = Some(shader.name());
		}

		merged.attributes |= attributes;
		merged.integrated += 1;
		merged.varying_count += result.varyings.len();
		merged.transformed_uv |= result.transformed_uv;
		merged.read_depth |= result.read_depth;
		merged.extensions.extend(shader.extensions().iter().copied());
	}

	// Every blend function gets its own name, so that effects blending
	// differently can live in the same shader
	let mut blend_code = String::new();
	for blend_function in merged.blend_functions.iter() {
		if let Some(code) = blend_function.shader_code() {
			let mut shader = Shader::from(code);
			shader.rename_symbol("blend", &format!("blend{}", blend_function.id()));
			blend_code.push_str(&shader.build_source(&ShaderAssets)?);
			blend_code.push('\n');
		}
	}
	merged.prepend(Section::FragmentHead, &blend_code);

	if merged.attributes.contains(EffectAttributes::DEPTH) && merged.read_depth {
		merged.prepend(Section::FragmentMainImage, "float depth = readDepth(UV);\n\n\t");
	}

	if merged.transformed_uv {
		merged.prepend(Section::FragmentMainUv, "vec2 transformedUv = vUv;\n");
		merged.defines.insert("UV".to_owned(), "transformedUv".to_owned());
	} else {
		merged.defines.insert("UV".to_owned(), "vUv".to_owned());
	}

	for code in merged.sections.values_mut() {
		*code = code.trim().to_owned();
	}

	Ok(merged)
}

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

#[cfg(test)]
mod tests {
	use super::*;
	use crate::effects::{EffectOptions, ShaderEffect};

	const IMAGE: &str = "uniform float strength;\n\nvoid mainImage(const in vec4 inputColor, const in vec2 uv, out vec4 outputColor) {\n\toutputColor = inputColor * strength;\n}";

	fn effect(name: &str, fragment: &str, options: EffectOptions) -> Box<dyn Effect> {
		Box::new(ShaderEffect::new(name, fragment, options))
	}

	#[test]
	fn prefixes_everything_but_member_access() {
		let source = "uniform float foo; void main(){ x = foo + obj.foo; }";
		let prefixed = prefix_substrings("e0", &["foo"], source);

		assert_eq!(prefixed, "uniform float e0Foo; void main(){ x = e0Foo + obj.foo; }");
		assert_eq!(prefixed.matches("e0Foo").count(), 2);
	}

	#[test]
	fn control_flow_is_not_a_function() {
		let source = "void helper(float x) {\n\tif(enabled) {\n\t} else if(enabled) {\n\t}\n}";
		assert_eq!(find_functions(source), vec!["helper".to_owned()]);
	}

	#[test]
	fn capitalises_the_first_letter() {
		assert_eq!(prefixed_name("e3", "mainImage"), "e3MainImage");
		assert_eq!(prefixed_name("e3", "x"), "e3X");
	}

	#[test]
	fn integrates_a_main_image_effect() {
		let mut options = EffectOptions::default();
		options.uniforms.insert("strength".to_owned(), Uniform::new(2.0));
		options.defines.insert("SCALE".to_owned(), "strength * 2.0".to_owned());
		let shader = EffectShader::new("Strength", IMAGE, options);

		let mut merged = MergedShader::new();
		let result = integrate_effect("e0", &shader, &mut merged).unwrap().unwrap();

		assert!(!result.transformed_uv);
		assert!(!result.read_depth);

		let main_image = merged.section(Section::FragmentMainImage);
		assert!(main_image.contains("e0MainImage(color0, UV, color1);"));
		assert!(main_image.contains("color0 = blend16(color0, color1, e0BlendOpacity);"));

		let head = merged.section(Section::FragmentHead);
		assert!(head.contains("uniform float e0BlendOpacity;"));
		assert!(head.contains("uniform float e0Strength;"));
		assert!(head.contains("void e0MainImage("));
		assert!(head.contains("inputColor * e0Strength"));

		assert!(merged.uniforms.contains_key("e0Strength"));
		assert_eq!(merged.uniforms.get("e0BlendOpacity"), Some(&shader.blend_mode().opacity));
		assert_eq!(merged.defines.get("e0SCALE").map(String::as_str), Some("e0Strength * 2.0"));
	}

	#[test]
	fn effects_without_main_functions_are_errors() {
		let shader = EffectShader::new("Broken", "void main() {}", EffectOptions::default());
		let error = integrate_effect("e0", &shader, &mut MergedShader::new()).unwrap_err();

		assert_eq!(
			error,
			MergeError::MissingMainFunction {
				effect: "Broken".to_owned()
			}
		);
	}

	#[test]
	fn depth_is_passed_only_to_effects_that_ask_for_it() {
		let fragment = "void mainImage(const in vec4 inputColor, const in vec2 uv, const in float depth, out vec4 outputColor) { outputColor = vec4(depth); }";

		let plain = EffectShader::new("Depth", fragment, EffectOptions::default());
		let result = integrate_effect("e0", &plain, &mut MergedShader::new()).unwrap().unwrap();
		assert!(!result.read_depth);

		let options = EffectOptions {
			attributes: EffectAttributes::DEPTH,
			..Default::default()
		};
		let depth = EffectShader::new("Depth", fragment, options);
		let mut merged = MergedShader::new();
		let result = integrate_effect("e0", &depth, &mut merged).unwrap().unwrap();

		assert!(result.read_depth);
		assert!(merged.section(Section::FragmentMainImage).contains("e0MainImage(color0, UV, depth, color1);"));
	}

	#[test]
	fn uv_transforms_and_vertex_support() {
		let options = EffectOptions {
			vertex_shader: Some("varying vec2 vOffset;\n\nvoid mainSupport(const in vec2 uv) {\n\tvOffset = uv;\n}".to_owned()),
			..Default::default()
		};
		let fragment = "varying vec2 vOffset;\n\nvoid mainUv(inout vec2 uv) {\n\tuv += vOffset;\n}";
		let shader = EffectShader::new("Shift", fragment, options);

		let mut merged = MergedShader::new();
		let result = integrate_effect("e1", &shader, &mut merged).unwrap().unwrap();

		assert!(result.transformed_uv);
		assert_eq!(result.varyings, vec!["vOffset".to_owned()]);
		assert!(merged.section(Section::FragmentMainUv).contains("e1MainUv(UV);"));
		assert!(merged.section(Section::VertexMainSupport).contains("e1MainSupport(vUv);"));
		assert!(merged.section(Section::VertexHead).contains("e1VOffset = uv;"));
		assert!(merged.section(Section::FragmentHead).contains("uv += e1VOffset;"));
		// Nothing to blend without a mainImage
		assert!(merged.section(Section::FragmentMainImage).is_empty());
	}

	#[test]
	fn uv_transforms_stay_out_of_convolution_passes() {
		let mut merged = MergedShader::new();
		merged.attributes = EffectAttributes::CONVOLUTION;

		let shader = EffectShader::new("Shift", "void mainUv(inout vec2 uv) {}", EffectOptions::default());
		assert_eq!(integrate_effect("e1", &shader, &mut merged), Ok(None));
		assert!(merged.section(Section::FragmentMainUv).is_empty());
	}

	#[test]
	fn skipped_effects_produce_no_code() {
		let options = || EffectOptions {
			blend_function: BlendFunction::Skip,
			..Default::default()
		};
		let merged = merge(&[effect("A", IMAGE, options()), effect("B", IMAGE, options())]).unwrap();

		assert!(merged.skip_rendering());
		assert_eq!(merged.integrated, 0);
		assert!(merged.section(Section::FragmentHead).is_empty());
		assert!(merged.section(Section::FragmentMainImage).is_empty());
		assert_eq!(merged.defines.get("UV").map(String::as_str), Some("vUv"));
	}

	#[test]
	fn two_convolution_effects_conflict() {
		let options = || EffectOptions {
			attributes: EffectAttributes::CONVOLUTION,
			..Default::default()
		};
		let error = merge(&[effect("A", IMAGE, options()), effect("B", IMAGE, options())]).unwrap_err();

		assert_eq!(
			error.downcast_ref::<MergeError>(),
			Some(&MergeError::ConvolutionConflict {
				effect: "B".to_owned(),
				integrated: "A".to_owned()
			})
		);
	}

	#[test]
	fn blend_functions_are_renamed_and_included_once() {
		let normal = || EffectOptions {
			blend_function: BlendFunction::Normal,
			..Default::default()
		};
		let merged = merge(&[
			effect("A", IMAGE, normal()),
			effect("B", IMAGE, normal()),
			effect("C", IMAGE, EffectOptions::default()),
		])
		.unwrap();

		let head = merged.section(Section::FragmentHead);
		assert_eq!(head.matches("vec4 blend13(").count(), 1);
		assert_eq!(head.matches("vec4 blend16(").count(), 1);
		assert!(!head.contains("vec4 blend("));
		assert!(head.starts_with("vec4 blend13("));

		assert_eq!(merged.integrated, 3);
		assert!(merged.section(Section::FragmentMainImage).contains("e2MainImage"));
		assert_eq!(merged.uniform_count(), 3);
	}

	#[test]
	fn sections_are_trimmed() {
		let merged = merge(&[effect("A", IMAGE, EffectOptions::default())]).unwrap();

		for section in Section::ALL {
			let code = merged.section(section);
			assert_eq!(code, code.trim(), "{:?} is not trimmed", section);
		}
	}
}
