pub mod lua_bundle;

pub use lua_bundle::{
    bundle_length, exceeds_size_limit, write_bundle, LuaBundleFormatter, SIZE_LIMIT,
};
