//! ロケール変更の通知

use super::Localiser;

/// ロケールの切り替えに成功した後、購読者に届くイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    /// 直前のロケール。初期化後に初めて有効化した場合は `None`
    pub previous: Option<String>,
    /// 新しいロケール
    pub current: String,
}

/// [`Localiser::subscribe`] が返すハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// ロケール変更のコールバック
///
/// 渡されたローカライザーから状態を読めるが、変更したり切り替えを拒否したりはできない。
pub type LocaleCallback = Box<dyn FnMut(&Localiser, &LocaleChanged)>;

/// 登録順に並んだ購読者
#[derive(Default)]
pub(super) struct Subscribers {
    /// 次に払い出す ID
    next_id: u64,
    /// 登録順のコールバック
    callbacks: Vec<(SubscriptionId, LocaleCallback)>,
}

impl Subscribers {
    /// 末尾に登録し、ID を払い出す
    pub(super) fn add(&mut self, callback: LocaleCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    /// 登録を解除する。見つからなければ `false`
    pub(super) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// 購読者の数
    pub(super) fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// 一覧を取り出す
    ///
    /// 通知中にコールバックがローカライザーを借用できるようにするため。
    pub(super) fn take(&mut self) -> Self {
        Self { next_id: self.next_id, callbacks: std::mem::take(&mut self.callbacks) }
    }

    /// [`Subscribers::take`] で取り出した一覧を戻す
    pub(super) fn restore(&mut self, taken: Self) {
        self.callbacks = taken.callbacks;
    }

    /// 登録順に同期的に呼び出す
    pub(super) fn notify(&mut self, localiser: &Localiser, event: &LocaleChanged) {
        for (_, callback) in &mut self.callbacks {
            callback(localiser, event);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("next_id", &self.next_id)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
