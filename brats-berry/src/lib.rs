#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 提供 BraTS 数据集中 3D 脑部 MRI 扫描和分割标签的结构化加载,
//! 以及面向训练循环的轻量预处理.
//!
//! 该 crate 仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 该 crate 目前主要负责处理 BraTS 2020 训练集格式的数据
//!   (如果新数据按照 BraTS 模式组织, 并提供相应的 [`NamingScheme`], 也可以工作).
//! 2. 加载过程中的所有错误均以 [`Error`] 返回给调用者, 不做任何重试或恢复.
//!
//! # 数据集目录结构
//!
//! ```text
//! root/
//! ├── BraTS20_Training_001/
//! │   ├── BraTS20_Training_001_flair.nii
//! │   ├── BraTS20_Training_001_t1.nii
//! │   ├── BraTS20_Training_001_t1ce.nii
//! │   ├── BraTS20_Training_001_t2.nii
//! │   └── BraTS20_Training_001_seg.nii
//! └── BraTS20_Training_002/
//!     └── ...
//! ```
//!
//! 样本由其在 (按名称排序的) 子目录列表中的位置 `pos` 标识,
//! 文件名中的序号为 `pos + 1`, 按三位补零.
//!
//! # 功能
//!
//! ### 样本索引 ✅
//!
//! 实现位于 `brats-berry/src/dataset/index.rs`.
//!
//! ### 按模态加载 (扫描, 标签) 对 ✅
//!
//! 图像按自身最大值归一化, 标签 2 -> 0, 4 -> 1, 并添加前置通道维度.
//!
//! 实现位于 `brats-berry/src/dataset/brats3d.rs`.
//!
//! ### 批量标签二值化 ✅
//!
//! 离线遍历数据集, 为每个 `_seg.nii` 生成 `_seg_mod.nii`.
//!
//! 实现位于 `brats-berry/src/remap.rs`.

/// 三维索引 / 形状, 按 nifti 原始的 `(x, y, z)` 顺序.
pub type Idx3d = (usize, usize, usize);

/// 3D MRI nii 文件基础数据结构.
mod data;

mod error;

pub use data::{MriLabel, MriScan, NiftiHeaderAttr};
pub use error::{Error, Result};

pub mod config;
pub mod consts;
pub mod dataset;
pub mod modality;
pub mod naming;
pub mod prelude;
pub mod remap;
pub mod transform;

pub use config::{DatasetConfig, ZeroMaxPolicy};
pub use modality::Modality;
pub use naming::NamingScheme;
