//! 体数据的轻量预处理: 最大值归一化, 标签重映射, 通道维度.

use crate::consts::label::{is_tumor_core, BRATS_EDEMA, BRATS_ENHANCING, FOREGROUND};
use ndarray::{Array, ArrayBase, Axis, Data, DataMut, Dimension};
use num::Float;

/// 求数组中的最大值, 忽略 NaN. 数组为空或全为 NaN 时返回 `None`.
pub fn max_value<A, S, D>(data: &ArrayBase<S, D>) -> Option<A>
where
    A: Float,
    S: Data<Elem = A>,
    D: Dimension,
{
    data.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: A| m.max(v))))
}

/// 可以作为归一化除数的最大值: 有限且非零.
#[inline]
fn usable_max<A, S, D>(data: &ArrayBase<S, D>) -> Option<A>
where
    A: Float,
    S: Data<Elem = A>,
    D: Dimension,
{
    max_value(data).filter(|m| m.is_finite() && *m != A::zero())
}

/// 将 `data` 逐元素除以其最大值.
///
/// 成功时返回所用的最大值. 若最大值不存在, 为 0 或非有限值, 则不修改数据并返回
/// `None`, 由调用者决定如何处理.
///
/// 仅当最小值非负时, 结果才落在 `[0, 1]` 内.
pub fn normalize_by_max<A, S, D>(data: &mut ArrayBase<S, D>) -> Option<A>
where
    A: Float,
    S: DataMut<Elem = A>,
    D: Dimension,
{
    let max = usable_max(data)?;
    data.mapv_inplace(|v| v / max);
    Some(max)
}

/// 将 BraTS 原始标签重映射为训练用标签: 2 (水肿) -> 0, 4 (增强肿瘤) -> 1,
/// 其他取值保持不变.
///
/// 返回被修改的体素个数.
pub fn remap_training_labels<S, D>(data: &mut ArrayBase<S, D>) -> usize
where
    S: DataMut<Elem = f32>,
    D: Dimension,
{
    let mut cnt = 0usize;
    data.iter_mut().for_each(|v| {
        if *v == BRATS_EDEMA {
            *v = 0.0;
            cnt += 1;
        } else if *v == BRATS_ENHANCING {
            *v = FOREGROUND;
            cnt += 1;
        }
    });
    cnt
}

/// 生成肿瘤核心二值掩码: 原标签为 1 或 4 处为 1, 其余为 0.
pub fn tumor_core_mask<S, D>(data: &ArrayBase<S, D>) -> Array<f32, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    data.mapv(|v| if is_tumor_core(v) { FOREGROUND } else { 0.0 })
}

/// 在最前面添加长度为 1 的通道维度.
#[inline]
pub fn add_channel_axis<A, D: Dimension>(data: Array<A, D>) -> Array<A, D::Larger> {
    data.insert_axis(Axis(0))
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        /// 借助 `rayon`, 并行地执行 [`normalize_by_max`].
        pub fn par_normalize_by_max<A, S, D>(data: &mut ArrayBase<S, D>) -> Option<A>
        where
            A: Float + Send + Sync,
            S: DataMut<Elem = A>,
            D: Dimension,
        {
            let max = usable_max(data)?;
            data.par_mapv_inplace(|v| v / max);
            Some(max)
        }

        /// 借助 `rayon`, 并行地执行 [`remap_training_labels`]. 不统计修改个数.
        pub fn par_remap_training_labels<S, D>(data: &mut ArrayBase<S, D>)
        where
            S: DataMut<Elem = f32>,
            D: Dimension,
        {
            data.par_mapv_inplace(|v| {
                if v == BRATS_EDEMA {
                    0.0
                } else if v == BRATS_ENHANCING {
                    FOREGROUND
                } else {
                    v
                }
            });
        }
    }
}
