use derive_more::Display;

use crate::effects::integration::Section;

/*
--------------------------------------------------------------------------------
||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||||
--------------------------------------------------------------------------------
*/

/// Configuration errors raised while merging effects into a single shader.
#[derive(Display, Clone, Debug, PartialEq, Eq)]
pub enum MergeError {
	#[display(
		fmt = "Convolution effects cannot be merged: '{}' conflicts with '{}'",
		effect,
		integrated
	)]
	ConvolutionConflict { effect: String, integrated: String },

	#[display(fmt = "Could not find a mainImage or mainUv function in effect '{}'", effect)]
	MissingMainFunction { effect: String },

	#[display(fmt = "Shader template section {:?} is missing", _0)]
	MissingSection(Section),
}

impl std::error::Error for MergeError {}
