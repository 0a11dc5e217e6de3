//! 通用常量.

use crate::Idx3d;

/// BraTS 原始标签值.
pub mod label {
    /// 背景的体素值.
    pub const BRATS_BACKGROUND: f32 = 0.0;

    /// 坏死与非增强肿瘤核心 (NCR/NET) 的体素值.
    pub const BRATS_NECROTIC: f32 = 1.0;

    /// 瘤周水肿 (ED) 的体素值.
    pub const BRATS_EDEMA: f32 = 2.0;

    /// 增强肿瘤 (ET) 的体素值. BraTS 不使用标签 3.
    pub const BRATS_ENHANCING: f32 = 4.0;

    /// 重映射之后, 前景 (肿瘤核心) 的体素值.
    pub const FOREGROUND: f32 = 1.0;

    /// 体素是否属于肿瘤核心 (NCR/NET 或 ET)?
    #[inline]
    pub fn is_tumor_core(v: f32) -> bool {
        v == BRATS_NECROTIC || v == BRATS_ENHANCING
    }
}

/// BraTS 单个 MRI 体数据的标准形状, `(x, y, z)`.
pub const BRATS_SHAPE: Idx3d = (240, 240, 155);

/// BraTS 2020 训练集大小.
pub const BRATS20_TRAINING_SET_LEN: usize = 369;

/// 文件名序号补零后的位数.
pub const BRATS_ORDINAL_DIGITS: usize = 3;

/// 读取数据集根目录所用的环境变量名.
pub const TRAIN_DIR_ENV: &str = "BRATS_TRAIN_DIR";
