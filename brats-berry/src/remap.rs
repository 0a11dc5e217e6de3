//! 批量标签二值化.
//!
//! 离线遍历整个数据集目录, 为每个分割标签文件 (`*_seg.nii`) 生成肿瘤核心二值掩码
//! (原标签为 1 或 4 处为 1, 其余为 0), 写入同目录下的 `*_seg_mod.nii`.
//! 写出的文件沿用原文件的 header, 因此仿射变换, 体素分辨率和存储类型都保持不变.
//!
//! 遇到第一个错误即中止, 此前已写出的文件会保留.

use crate::dataset::ensure_root_dir;
use crate::transform::tumor_core_mask;
use crate::{Error, MriLabel, NamingScheme, NiftiHeaderAttr, Result};
use ndarray::Array3;
use nifti::writer::WriterOptions;
use nifti::{NiftiHeader, NiftiType};
use std::fs;
use std::path::{Path, PathBuf};

/// 以 BraTS 默认命名规则对 `root` 执行批量标签二值化.
///
/// 返回写出的文件个数.
#[inline]
pub fn remap_all_labels<P: AsRef<Path>>(root: P) -> Result<usize> {
    remap_all_labels_with(root, &NamingScheme::default())
}

/// 以指定命名规则对 `root` 执行批量标签二值化.
///
/// 返回写出的文件个数.
pub fn remap_all_labels_with<P: AsRef<Path>>(root: P, naming: &NamingScheme) -> Result<usize> {
    let files = seg_files(root.as_ref(), naming)?;
    for src in files.iter() {
        remap_seg_file(src, naming)?;
    }
    log::info!("remapped {} segmentation files", files.len());
    Ok(files.len())
}

/// 递归收集 `root` 下所有分割标签文件, 每层目录内按名称排序.
/// 不跟随指向目录的符号链接.
pub fn seg_files(root: &Path, naming: &NamingScheme) -> Result<Vec<PathBuf>> {
    ensure_root_dir(root)?;
    let mut ans = Vec::new();
    collect_seg_files(root, naming, &mut ans)?;
    Ok(ans)
}

fn collect_seg_files(dir: &Path, naming: &NamingScheme, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| Error::io(&entry.path(), e))?
            .is_dir();
        entries.push((entry.path(), is_dir));
    }
    entries.sort_unstable();

    for (path, is_dir) in entries {
        if is_dir {
            collect_seg_files(&path, naming, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| naming.is_seg_file(n))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// 对单个分割标签文件执行二值化, 返回写出文件的路径.
pub fn remap_seg_file(src: &Path, naming: &NamingScheme) -> Result<PathBuf> {
    let dst = src
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| naming.remapped_seg_file_name(n))
        .map(|n| src.with_file_name(n))
        .ok_or_else(|| Error::NotASegFile(src.to_owned()))?;

    let label = MriLabel::open(src)?;
    let mask = tumor_core_mask(&label.data());
    write_mask(&dst, label.header(), &mask)?;

    log::debug!("`{}` -> `{}`", src.display(), dst.display());
    Ok(dst)
}

/// 以 `reference` 的 header 和存储类型写出掩码.
///
/// 掩码按原样存储, 因此 `scl_slope`/`scl_inter` 被重置为 1 和 0.
/// 写出器不支持的存储类型退化为 `u8`.
fn write_mask(dst: &Path, reference: &NiftiHeader, mask: &Array3<f32>) -> Result<()> {
    let mut header = reference.clone();
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    let writer = WriterOptions::new(dst).reference_header(&header);

    macro_rules! write_as {
        ($t: ty) => {
            writer.write_nifti(&mask.mapv(|v| v as $t))
        };
    }

    let written = match reference.data_type() {
        Ok(NiftiType::Int8) => write_as!(i8),
        Ok(NiftiType::Uint16) => write_as!(u16),
        Ok(NiftiType::Int16) => write_as!(i16),
        Ok(NiftiType::Uint32) => write_as!(u32),
        Ok(NiftiType::Int32) => write_as!(i32),
        Ok(NiftiType::Uint64) => write_as!(u64),
        Ok(NiftiType::Int64) => write_as!(i64),
        Ok(NiftiType::Float32) => write_as!(f32),
        Ok(NiftiType::Float64) => write_as!(f64),
        _ => write_as!(u8),
    };
    written.map_err(|e| Error::from_nifti(dst, e))
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::prelude::*;

        /// 借助 `rayon`, 并行地执行 [`remap_all_labels_with`].
        ///
        /// 任一文件出错时尽快中止并返回该错误; 其他线程上已写出的文件会保留.
        pub fn par_remap_all_labels_with<P: AsRef<Path>>(
            root: P,
            naming: &NamingScheme,
        ) -> Result<usize> {
            let files = seg_files(root.as_ref(), naming)?;
            files
                .par_iter()
                .try_for_each(|src| remap_seg_file(src, naming).map(drop))?;
            log::info!("remapped {} segmentation files", files.len());
            Ok(files.len())
        }

        /// 以 BraTS 默认命名规则执行 [`par_remap_all_labels_with`].
        #[inline]
        pub fn par_remap_all_labels<P: AsRef<Path>>(root: P) -> Result<usize> {
            par_remap_all_labels_with(root, &NamingScheme::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixture::{self, SHAPE};
    use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

    fn read(path: &Path) -> (NiftiHeader, ndarray::ArrayD<f32>) {
        let obj = ReaderOptions::new().read_file(path).unwrap();
        let header = obj.header().clone();
        (header, obj.into_volume().into_ndarray::<f32>().unwrap())
    }

    #[test]
    fn test_remap_writes_binary_mask_with_same_header() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = fixture::populate(tmp.path(), 2);
        assert_eq!(remap_all_labels(tmp.path()).unwrap(), 2);

        let naming = NamingScheme::default();
        for (i, dir) in dirs.iter().enumerate() {
            let src = dir.join(naming.seg_file_name(i + 1));
            let dst = dir.join(format!("{}_seg_mod.nii", naming.stem(i + 1)));
            assert!(dst.is_file());

            let (src_header, src_data) = read(&src);
            let (dst_header, dst_data) = read(&dst);

            assert_eq!(dst_data.shape(), &[SHAPE.0, SHAPE.1, SHAPE.2]);
            for (s, d) in src_data.iter().zip(dst_data.iter()) {
                let want = if *s == 1.0 || *s == 4.0 { 1.0 } else { 0.0 };
                assert_eq!(*d, want);
            }
            assert!(dst_data.iter().all(|v| *v == 0.0 || *v == 1.0));

            assert_eq!(dst_header.srow_x, src_header.srow_x);
            assert_eq!(dst_header.srow_y, src_header.srow_y);
            assert_eq!(dst_header.srow_z, src_header.srow_z);
            assert_eq!(dst_header.sform_code, src_header.sform_code);
            assert_eq!(dst_header.qform_code, src_header.qform_code);
            assert_eq!(dst_header.quatern_b, src_header.quatern_b);
            assert_eq!(dst_header.quatern_c, src_header.quatern_c);
            assert_eq!(dst_header.quatern_d, src_header.quatern_d);
            assert_eq!(dst_header.pixdim[1..4], src_header.pixdim[1..4]);
            assert_eq!(dst_header.dim, src_header.dim);
            assert_eq!(dst_header.datatype, src_header.datatype);
        }
    }

    #[test]
    fn test_remap_keeps_int16_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("case_seg.nii");
        // write_scan 以 i16 写出.
        fixture::write_scan(&src, &fixture::label_data());
        remap_all_labels(tmp.path()).unwrap();

        let (header, data) = read(&tmp.path().join("case_seg_mod.nii"));
        assert_eq!(header.data_type().unwrap(), NiftiType::Int16);
        assert_eq!(data.iter().filter(|v| **v == 1.0).count(), {
            let l = fixture::label_data();
            l.iter().filter(|v| **v == 1.0 || **v == 4.0).count()
        });
    }

    #[test]
    fn test_walk_is_recursive_and_skips_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fixture::write_label(&tmp.path().join("top_seg.nii"), &fixture::label_data());
        fixture::write_label(&nested.join("deep_seg.nii"), &fixture::label_data());
        fixture::write_scan(&nested.join("deep_flair.nii"), &fixture::scan_data(1));

        let naming = NamingScheme::default();
        assert_eq!(seg_files(tmp.path(), &naming).unwrap().len(), 2);
        assert_eq!(remap_all_labels(tmp.path()).unwrap(), 2);
        assert!(nested.join("deep_seg_mod.nii").is_file());
        assert!(!nested.join("deep_flair_mod.nii").exists());

        // 第二次运行只处理原始标签, 输出被覆盖而不是再次二值化.
        assert_eq!(remap_all_labels(tmp.path()).unwrap(), 2);
        assert!(!tmp.path().join("top_seg_mod_mod.nii").exists());
    }

    #[test]
    fn test_first_error_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        fixture::write_label(&tmp.path().join("a_seg.nii"), &fixture::label_data());
        fs::write(tmp.path().join("b_seg.nii"), b"garbage").unwrap();
        fixture::write_label(&tmp.path().join("c_seg.nii"), &fixture::label_data());

        let err = remap_all_labels(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Nifti { ref path, .. } if path.ends_with("b_seg.nii")));
        assert!(tmp.path().join("a_seg_mod.nii").is_file());
        assert!(!tmp.path().join("c_seg_mod.nii").exists());
    }

    #[test]
    fn test_not_a_seg_file() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("case_flair.nii");
        fixture::write_scan(&src, &fixture::scan_data(1));
        let err = remap_seg_file(&src, &NamingScheme::default()).unwrap_err();
        assert!(matches!(err, Error::NotASegFile(_)));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            remap_all_labels(tmp.path().join("missing")),
            Err(Error::RootNotFound(_))
        ));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_remap() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = fixture::populate(tmp.path(), 3);
        assert_eq!(par_remap_all_labels(tmp.path()).unwrap(), 3);
        let naming = NamingScheme::default();
        for (i, dir) in dirs.iter().enumerate() {
            assert!(dir.join(format!("{}_seg_mod.nii", naming.stem(i + 1))).is_file());
        }
    }
}
