//! 数据集位置的查找.

use brats_berry::consts::TRAIN_DIR_ENV;
use std::env;
use std::path::PathBuf;

/// `$HOME/dataset` 下 BraTS 2020 训练集的默认相对路径.
const HOME_TRAIN_DIR: [&str; 2] = ["BraTS2020_TrainingData", "MICCAI_BraTS2020_TrainingData"];

/// 获取 BraTS 训练集根目录.
///
/// 1. 若环境变量 `$BRATS_TRAIN_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/BraTS2020_TrainingData/MICCAI_BraTS2020_TrainingData`.
///
/// 无法确定用户主目录时返回 `None`.
pub fn train_dir_from_env_or_home() -> Option<PathBuf> {
    match env::var_os(TRAIN_DIR_ENV) {
        Some(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => brats_berry::dataset::home_dataset_dir_with(HOME_TRAIN_DIR),
    }
}
