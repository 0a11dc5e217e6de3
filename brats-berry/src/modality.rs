//! MRI 采集序列 (模态).

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// 分割标签文件的保留名. 它永远不能作为 [`Modality`] 被请求.
pub const RESERVED_SEG: &str = "seg";

/// BraTS 中一个病例包含的四种 MRI 模态.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Modality {
    /// T2 液体衰减反转恢复序列.
    #[default]
    Flair,

    /// T1 加权.
    T1,

    /// T1 加权对比增强.
    T1ce,

    /// T2 加权.
    T2,
}

impl Modality {
    /// 全部模态, 按 BraTS 惯用顺序.
    pub const ALL: [Modality; 4] = [Self::Flair, Self::T1, Self::T1ce, Self::T2];

    /// 模态的小写名称.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flair => "flair",
            Self::T1 => "t1",
            Self::T1ce => "t1ce",
            Self::T2 => "t2",
        }
    }

    /// 在 [`Modality::ALL`] 中的下标.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 大小写不敏感. `seg` 返回 [`Error::ReservedModality`],
/// 其他无法识别的名称返回 [`Error::UnknownModality`].
impl FromStr for Modality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "flair" => Ok(Self::Flair),
            "t1" => Ok(Self::T1),
            "t1ce" => Ok(Self::T1ce),
            "t2" => Ok(Self::T2),
            RESERVED_SEG => Err(Error::ReservedModality(s.to_owned())),
            _ => Err(Error::UnknownModality(s.to_owned())),
        }
    }
}
