//! 実行時のロケール解決（ローカライザー、変更通知、ローカライズ済みオブジェクト）
/// ロケール変更イベントと購読
mod events;
/// ロケールリゾルバー
mod localiser;
/// ローカライズ済みコンテンツの利用側
mod objects;

pub use events::{
    LocaleCallback,
    LocaleChanged,
    SubscriptionId,
};
pub use localiser::{
    Localiser,
    LocaliserError,
};
pub use objects::{
    Localised,
    LocalisedObject,
    ResourceLoader,
};
