//! Extra package index locations for the companion native extension package.

mod find_links;

pub use find_links::{
    DEFAULT_MMCV_BASE_URL, MMCV_BASE_URL_ENV, add_mmcv_find_links, device_segment, mmcv_base_url,
    mmcv_find_link, torch_segment, trusted_host,
};
