//! 世代カウンタ
//!
//! 画面ごとに保持し、リクエスト開始時に `Ticket` を払い出す。再読み込み・
//! タブ切替・アンマウントで世代を進めると、古い `Ticket` のレスポンスは
//! 適用されずに破棄される。

/// リクエスト開始時点の世代
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 世代を進めて新しいTicketを発行（それ以前のTicketは無効）
    pub fn begin(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    /// 発行済みのTicketをすべて無効化
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}
