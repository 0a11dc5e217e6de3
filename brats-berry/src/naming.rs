//! 文件命名规则.
//!
//! 加载器依据命名规则, 从样本序号和模态构造出扫描与标签的文件名.
//! 分割标签的后缀单独保存, 无法通过 [`Modality`] 选中.

use crate::consts::BRATS_ORDINAL_DIGITS;
use crate::{Error, Modality, Result};

/// 四种模态各自的文件名后缀.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModalitySuffixes {
    /// FLAIR.
    pub flair: String,

    /// T1.
    pub t1: String,

    /// T1ce.
    pub t1ce: String,

    /// T2.
    pub t2: String,
}

impl Default for ModalitySuffixes {
    fn default() -> Self {
        Self {
            flair: Modality::Flair.name().to_owned(),
            t1: Modality::T1.name().to_owned(),
            t1ce: Modality::T1ce.name().to_owned(),
            t2: Modality::T2.name().to_owned(),
        }
    }
}

impl ModalitySuffixes {
    /// 获取 `modality` 对应的后缀.
    #[inline]
    pub fn get(&self, modality: Modality) -> &str {
        match modality {
            Modality::Flair => &self.flair,
            Modality::T1 => &self.t1,
            Modality::T1ce => &self.t1ce,
            Modality::T2 => &self.t2,
        }
    }

    /// 获取 `modality` 对应后缀的可变引用.
    #[inline]
    pub fn get_mut(&mut self, modality: Modality) -> &mut String {
        match modality {
            Modality::Flair => &mut self.flair,
            Modality::T1 => &mut self.t1,
            Modality::T1ce => &mut self.t1ce,
            Modality::T2 => &mut self.t2,
        }
    }
}

/// 样本文件的命名规则.
///
/// 默认值对应 BraTS 2020 训练集:
/// `BraTS20_Training_{NNN}_{modality}.nii` 与 `BraTS20_Training_{NNN}_seg.nii`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NamingScheme {
    /// 序号之前的文件名前缀.
    pub prefix: String,

    /// 序号补零后的位数.
    pub digits: usize,

    /// 序号与后缀之间的分隔符.
    pub separator: String,

    /// 文件扩展名, 包含开头的 `.`.
    pub extension: String,

    /// 各模态的后缀.
    pub modalities: ModalitySuffixes,

    /// 分割标签后缀.
    pub seg_suffix: String,

    /// 批量二值化后的分割标签后缀.
    pub remapped_seg_suffix: String,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self {
            prefix: "BraTS20_Training_".to_owned(),
            digits: BRATS_ORDINAL_DIGITS,
            separator: "_".to_owned(),
            extension: ".nii".to_owned(),
            modalities: ModalitySuffixes::default(),
            seg_suffix: "seg".to_owned(),
            remapped_seg_suffix: "seg_mod".to_owned(),
        }
    }
}

impl NamingScheme {
    /// BraTS 2020 训练集的命名规则, 同 `Default`.
    #[inline]
    pub fn brats20_training() -> Self {
        Self::default()
    }

    /// 使用给定前缀, 其余部分与 BraTS 2020 相同.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// 检查规则是否自洽: 任何模态后缀都不能与分割标签后缀相同.
    pub fn validate(&self) -> Result<()> {
        for m in Modality::ALL {
            let suffix = self.modalities.get(m);
            if suffix == self.seg_suffix || suffix == self.remapped_seg_suffix {
                return Err(Error::ReservedModality(suffix.to_owned()));
            }
        }
        Ok(())
    }

    /// 文件名主干, 如 `BraTS20_Training_007`.
    #[inline]
    pub fn stem(&self, ordinal: usize) -> String {
        format!("{}{:0width$}", self.prefix, ordinal, width = self.digits)
    }

    /// 第 `ordinal` 号样本 (从 1 开始) 的 `modality` 扫描文件名.
    pub fn scan_file_name(&self, ordinal: usize, modality: Modality) -> String {
        format!(
            "{}{}{}{}",
            self.stem(ordinal),
            self.separator,
            self.modalities.get(modality),
            self.extension
        )
    }

    /// 第 `ordinal` 号样本 (从 1 开始) 的分割标签文件名.
    pub fn seg_file_name(&self, ordinal: usize) -> String {
        format!("{}{}", self.stem(ordinal), self.seg_file_suffix())
    }

    /// 分割标签文件的完整后缀, 如 `_seg.nii`.
    #[inline]
    pub fn seg_file_suffix(&self) -> String {
        format!("{}{}{}", self.separator, self.seg_suffix, self.extension)
    }

    /// 二值化分割标签文件的完整后缀, 如 `_seg_mod.nii`.
    #[inline]
    pub fn remapped_seg_file_suffix(&self) -> String {
        format!("{}{}{}", self.separator, self.remapped_seg_suffix, self.extension)
    }

    /// 文件名是否是 (原始) 分割标签文件?
    #[inline]
    pub fn is_seg_file(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.seg_file_suffix())
    }

    /// 由分割标签文件名得到二值化后的文件名. 若 `file_name` 不是分割标签文件,
    /// 返回 `None`.
    pub fn remapped_seg_file_name(&self, file_name: &str) -> Option<String> {
        let stem = file_name.strip_suffix(&self.seg_file_suffix())?;
        Some(format!("{stem}{}", self.remapped_seg_file_suffix()))
    }
}
