//! 🍇欢迎光临🧠
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::config::{DatasetConfig, ZeroMaxPolicy};
pub use crate::data::{MriLabel, MriScan, NiftiHeaderAttr};
pub use crate::error::{Error, Result};
pub use crate::modality::Modality;
pub use crate::naming::NamingScheme;

pub use crate::consts::label::{BRATS_BACKGROUND, BRATS_EDEMA, BRATS_ENHANCING, BRATS_NECROTIC};
pub use crate::consts::{BRATS20_TRAINING_SET_LEN, BRATS_SHAPE};

pub use crate::dataset::{home_dataset_dir_with, BratsDataset3d, Sample, SampleIndex};
pub use crate::remap::remap_all_labels;
