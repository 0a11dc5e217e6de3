//! 数据集加载配置.

use crate::consts::BRATS_SHAPE;
use crate::{Idx3d, Modality, NamingScheme};

/// 图像最大值为 0 (或非有限值) 时的归一化策略.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroMaxPolicy {
    /// 返回 [`crate::Error::ZeroMaximum`].
    #[default]
    Reject,

    /// 不做归一化, 原样返回图像.
    PassThrough,
}

/// 数据集加载配置. 默认值对应 BraTS 2020 训练集.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatasetConfig {
    /// 文件命名规则.
    pub naming: NamingScheme,

    /// 零最大值策略.
    pub zero_max: ZeroMaxPolicy,

    /// 体数据的期望形状 `(x, y, z)`. 为 `None` 时不检查.
    pub expected_shape: Option<Idx3d>,

    /// `get` 使用的模态.
    pub default_modality: Modality,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            naming: NamingScheme::default(),
            zero_max: ZeroMaxPolicy::default(),
            expected_shape: Some(BRATS_SHAPE),
            default_modality: Modality::Flair,
        }
    }
}

impl DatasetConfig {
    /// 替换命名规则.
    #[inline]
    pub fn with_naming(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }

    /// 替换零最大值策略.
    #[inline]
    pub fn with_zero_max(mut self, policy: ZeroMaxPolicy) -> Self {
        self.zero_max = policy;
        self
    }

    /// 替换期望形状.
    #[inline]
    pub fn with_expected_shape(mut self, shape: Option<Idx3d>) -> Self {
        self.expected_shape = shape;
        self
    }

    /// 替换默认模态.
    #[inline]
    pub fn with_default_modality(mut self, modality: Modality) -> Self {
        self.default_modality = modality;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_brats20() {
        let c = DatasetConfig::default();
        assert_eq!(c.expected_shape, Some((240, 240, 155)));
        assert_eq!(c.zero_max, ZeroMaxPolicy::Reject);
        assert_eq!(c.default_modality, Modality::Flair);
        assert_eq!(c.naming, NamingScheme::brats20_training());
    }

    #[test]
    fn test_builder() {
        let c = DatasetConfig::default()
            .with_zero_max(ZeroMaxPolicy::PassThrough)
            .with_expected_shape(None)
            .with_default_modality(Modality::T2);
        assert_eq!(c.zero_max, ZeroMaxPolicy::PassThrough);
        assert_eq!(c.expected_shape, None);
        assert_eq!(c.default_modality, Modality::T2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_partial() {
        let c: DatasetConfig =
            serde_json::from_str(r#"{"zero_max": "pass_through", "default_modality": "t1ce"}"#)
                .unwrap();
        assert_eq!(c.zero_max, ZeroMaxPolicy::PassThrough);
        assert_eq!(c.default_modality, Modality::T1ce);
        assert_eq!(c.naming, NamingScheme::default());

        let s = serde_json::to_string(&c).unwrap();
        let back: DatasetConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back, c);
    }
}
