//! locale-tables
//!
//! バージョン付きハッシュキーのローカライズテーブルと、テーブルを探索して
//! ロケールを切り替え、参照に応えるランタイム

pub mod config;
pub mod encoding;
pub mod locale;
pub mod runtime;
pub mod schema;
pub mod source;
pub mod table;
pub mod types;

mod test_utils;

pub use encoding::{
    CURRENT_ENCODING_VERSION,
    KeyEncoding,
    encode,
};
pub use runtime::Localiser;
pub use types::EncodedKey;
