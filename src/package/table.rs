//! Known package names and the projects they belong to.

/// Native extension package. Never receives the `mminstall` extra, since its
/// own requirements would otherwise pull it back in circularly.
pub const COMPANION_PACKAGE: &str = "onedl-mmcv";

/// Package name -> owning project.
pub const PKG2PROJECT: &[(&str, &str)] = &[
    ("onedl-mmcv", "mmcv"),
    ("onedl-mmpretrain", "mmpretrain"),
    ("onedl-mmdetection", "mmdet"),
    ("onedl-mmdetection3d", "mmdet3d"),
    ("onedl-mmsegmentation", "mmsegmentation"),
    ("onedl-mmpose", "mmpose"),
    ("onedl-mmrotate", "mmrotate"),
    ("onedl-mmagic", "mmagic"),
    ("onedl-mmocr", "mmocr"),
    ("onedl-mmyolo", "mmyolo"),
    ("onedl-mmaction2", "mmaction2"),
    ("onedl-mmrazor", "mmrazor"),
    ("onedl-mmdeploy", "mmdeploy"),
    ("mmcls", "mmcls"),
    ("mmpretrain", "mmpretrain"),
    ("mmdet", "mmdet"),
    ("mmdet3d", "mmdet3d"),
    ("mmsegmentation", "mmsegmentation"),
    ("mmaction2", "mmaction2"),
    ("mmtrack", "mmtrack"),
    ("mmpose", "mmpose"),
    ("mmedit", "mmedit"),
    ("mmagic", "mmagic"),
    ("mmocr", "mmocr"),
    ("mmgen", "mmgen"),
    ("mmselfsup", "mmselfsup"),
    ("mmrotate", "mmrotate"),
    ("mmflow", "mmflow"),
    ("mmyolo", "mmyolo"),
    ("mmrazor", "mmrazor"),
    ("mmfewshot", "mmfewshot"),
    ("mmhuman3d", "mmhuman3d"),
];

/// Project that owns `name`, matched exactly.
pub fn project_of(name: &str) -> Option<&'static str> {
    PKG2PROJECT
        .iter()
        .find(|(pkg, _)| *pkg == name)
        .map(|(_, project)| *project)
}

/// Whether `name` is a known package that should carry the `mminstall` extra.
pub fn is_project_package(name: &str) -> bool {
    name != COMPANION_PACKAGE && project_of(name).is_some()
}

/// Lowercase, underscores to hyphens.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}
