//! ロケール変更時に内容を取り直すローカライズ済みオブジェクト

use super::{
    Localiser,
    LocaliserError,
};
use crate::encoding::{
    KeyEncoding,
    encode,
};
use crate::schema::Schema;
use crate::types::{
    EncodedKey,
    ResourceType,
};

/// ローカライズされたパスからアセットを読み込むホスト側の機能
pub trait ResourceLoader {
    /// 読み込んだアセットの型
    type Resource;

    /// アセットを用意できない場合は `None`
    fn load_resource(&mut self, kind: ResourceType, path: &str) -> Option<Self::Resource>;
}

/// キーが指す内容の種類でタグ付けしたローカライズ済みコンテンツ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalisedObject {
    /// テキスト
    Text {
        /// エンコード済みキー
        key: EncodedKey,
    },
    /// 画像（値はアセットパス）
    Image {
        /// エンコード済みキー
        key: EncodedKey,
    },
    /// 音声（値はアセットパス）
    Audio {
        /// エンコード済みキー
        key: EncodedKey,
    },
}

/// [`LocalisedObject`] を解決した結果、表示すべきもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Localised<R> {
    /// 翻訳済みテキスト
    Text(String),
    /// 翻訳がないテキストの目印
    Placeholder(String),
    /// 読み込んだアセット
    Resource(R),
    /// ローダーがアセットを用意できなかった。表示中のものを維持する
    Unchanged,
    /// アセットキーに翻訳がない。何も表示しない
    Cleared,
}

impl LocalisedObject {
    /// リソースの種類とキーから作成
    #[must_use]
    pub const fn new(resource_type: ResourceType, key: EncodedKey) -> Self {
        match resource_type {
            ResourceType::Text => Self::Text { key },
            ResourceType::Image => Self::Image { key },
            ResourceType::Audio => Self::Audio { key },
        }
    }

    /// スキーマの識別子からオブジェクトを作成
    ///
    /// 種類はカテゴリのリソースタイプから決まる。識別子が未知なら `None`。
    #[must_use]
    pub fn from_schema(
        schema: &Schema,
        category: &str,
        key: &str,
        version: KeyEncoding,
    ) -> Option<Self> {
        let lookup = schema.find_key(category, key);
        if !lookup.valid {
            return None;
        }
        let resource_type = schema.categories.get(lookup.category_index)?.resource_type;
        Some(Self::new(resource_type, encode(category, key, version)))
    }

    /// エンコード済みキー
    #[must_use]
    pub const fn key(&self) -> EncodedKey {
        match self {
            Self::Text { key } | Self::Image { key } | Self::Audio { key } => *key,
        }
    }

    /// リソースの種類
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        match self {
            Self::Text { .. } => ResourceType::Text,
            Self::Image { .. } => ResourceType::Image,
            Self::Audio { .. } => ResourceType::Audio,
        }
    }

    /// 常駐テーブルから内容を取り出す
    ///
    /// # Errors
    /// [`LocaliserError::NotInitialised`]: 常駐テーブルがない
    pub fn resolve<L: ResourceLoader>(
        &self,
        localiser: &Localiser,
        loader: &mut L,
    ) -> Result<Localised<L::Resource>, LocaliserError> {
        let key = self.key();
        let found = localiser.get_localised_string(key)?;

        Ok(match (self.resource_type(), found) {
            (ResourceType::Text, Some(text)) => Localised::Text(text.to_string()),
            (ResourceType::Text, None) => {
                Localised::Placeholder(localiser.settings().placeholder_for(key))
            }
            (kind, Some(path)) => loader.load_resource(kind, path).map_or_else(
                || {
                    tracing::debug!(%kind, path, "Resource loader could not provide asset");
                    Localised::Unchanged
                },
                Localised::Resource,
            ),
            (_, None) => Localised::Cleared,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use std::path::Path;

    use rstest::*;

    use super::*;
    use crate::config::LocaliserSettings;
    use crate::schema::Category;
    use crate::table::LocalisationTable;
    use crate::test_utils::MemoryTableSource;

    /// Loads only assets whose path starts with `assets/`.
    #[derive(Debug, Default)]
    struct PrefixLoader {
        requests: Vec<(ResourceType, String)>,
    }

    impl ResourceLoader for PrefixLoader {
        type Resource = String;

        fn load_resource(&mut self, kind: ResourceType, path: &str) -> Option<String> {
            self.requests.push((kind, path.to_string()));
            path.starts_with("assets/").then(|| format!("loaded:{path}"))
        }
    }

    #[fixture]
    fn schema() -> Schema {
        Schema::new(vec![
            Category::new("UI", ResourceType::Text).with_keys(["Title", "Quit"]),
            Category::new("Flags", ResourceType::Image).with_keys(["Banner", "Broken", "Absent"]),
            Category::new("Voice", ResourceType::Audio).with_keys(["Intro"]),
        ])
    }

    #[fixture]
    fn localiser() -> Localiser {
        let v = KeyEncoding::V2;
        let mut table = LocalisationTable::new(["en-US"]);
        table.set_entry(encode("UI", "Title", v), "Hello");
        table.set_entry(encode("Flags", "Banner", v), "assets/flag_us.png");
        table.set_entry(encode("Flags", "Broken", v), "elsewhere/flag.png");
        table.set_entry(encode("Voice", "Intro", v), "assets/intro.ogg");
        let source = MemoryTableSource::new().with_table("en.loctable.json", table);

        let mut localiser = Localiser::new(Box::new(source), LocaliserSettings::default());
        localiser.initialise(Path::new("res"), Some("en-US")).unwrap();
        localiser
    }

    fn object(schema: &Schema, category: &str, key: &str) -> LocalisedObject {
        LocalisedObject::from_schema(schema, category, key, KeyEncoding::V2).unwrap()
    }

    #[rstest]
    fn from_schema_picks_variant_from_category(schema: Schema) {
        let key = encode("Flags", "Banner", KeyEncoding::V2);

        assert_eq!(object(&schema, "Flags", "Banner"), LocalisedObject::Image { key });
        assert_eq!(object(&schema, "Voice", "Intro").resource_type(), ResourceType::Audio);
        assert_eq!(object(&schema, "UI", "Title").resource_type(), ResourceType::Text);
        assert_eq!(LocalisedObject::from_schema(&schema, "UI", "Banner", KeyEncoding::V2), None);
    }

    #[rstest]
    fn text_resolves_to_content_or_placeholder(schema: Schema, localiser: Localiser) {
        let mut loader = PrefixLoader::default();
        let quit = object(&schema, "UI", "Quit");

        assert_eq!(
            object(&schema, "UI", "Title").resolve(&localiser, &mut loader).unwrap(),
            Localised::Text("Hello".to_string())
        );
        assert_eq!(
            quit.resolve(&localiser, &mut loader).unwrap(),
            Localised::Placeholder(format!("<missing:{}>", quit.key()))
        );
        assert!(loader.requests.is_empty());
    }

    #[rstest]
    fn assets_go_through_the_loader(schema: Schema, localiser: Localiser) {
        let mut loader = PrefixLoader::default();

        let banner = object(&schema, "Flags", "Banner").resolve(&localiser, &mut loader).unwrap();
        let intro = object(&schema, "Voice", "Intro").resolve(&localiser, &mut loader).unwrap();

        assert_eq!(banner, Localised::Resource("loaded:assets/flag_us.png".to_string()));
        assert_eq!(intro, Localised::Resource("loaded:assets/intro.ogg".to_string()));
        assert_eq!(
            loader.requests,
            vec![
                (ResourceType::Image, "assets/flag_us.png".to_string()),
                (ResourceType::Audio, "assets/intro.ogg".to_string()),
            ]
        );
    }

    #[rstest]
    fn unloadable_asset_is_unchanged(schema: Schema, localiser: Localiser) {
        let mut loader = PrefixLoader::default();

        let result = object(&schema, "Flags", "Broken").resolve(&localiser, &mut loader).unwrap();

        assert_eq!(result, Localised::Unchanged);
    }

    #[rstest]
    fn untranslated_asset_is_cleared(schema: Schema, localiser: Localiser) {
        let mut loader = PrefixLoader::default();

        let result = object(&schema, "Flags", "Absent").resolve(&localiser, &mut loader).unwrap();

        assert_eq!(result, Localised::Cleared);
        assert!(loader.requests.is_empty());
    }

    #[rstest]
    fn resolve_before_initialise_fails(schema: Schema) {
        let localiser =
            Localiser::new(Box::new(MemoryTableSource::new()), LocaliserSettings::default());

        let result = object(&schema, "UI", "Title").resolve(&localiser, &mut PrefixLoader::default());

        assert!(matches!(result, Err(LocaliserError::NotInitialised)));
    }
}
