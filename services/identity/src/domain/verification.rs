//! 一次性验证码存储
//!
//! 进程内 TTL 注册表：每个标识符最多一条在途验证码，
//! 验证成功即消费，过期在读取时惰性清除。

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::Rng;
use rand::rngs::OsRng;
use std::sync::Arc;
use thiserror::Error;

/// 验证码校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// 该标识符没有在途的验证请求
    #[error("No verification code was requested")]
    NotRequested,

    /// 验证码已过期（条目已清除，需重新申请）
    #[error("Verification code has expired")]
    Expired,

    /// 验证码不匹配（条目保留，可在窗口内重试）
    #[error("Verification code does not match")]
    Mismatch,
}

/// 时钟抽象，测试中用于控制过期
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 验证码生成器
pub trait CodeGenerator: Send + Sync {
    /// 生成 6 位数字验证码
    fn generate(&self) -> String;
}

/// 基于操作系统 CSPRNG 的验证码生成器
///
/// 每次调用独立取随机数，均匀分布在 000000..=999999。
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        format!("{:06}", OsRng.gen_range(0..1_000_000))
    }
}

#[derive(Debug, Clone)]
struct VerificationEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

/// 一次性验证码存储
///
/// DashMap 按分片加锁：`verify` 的查找-过期检查-比对-消费序列
/// 在标识符所属分片的锁内完成，同一标识符的并发调用串行化；
/// 不同标识符互不阻塞。
pub struct VerificationStore {
    entries: DashMap<String, VerificationEntry>,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn CodeGenerator>,
    window: Duration,
}

impl VerificationStore {
    pub fn new(clock: Arc<dyn Clock>, codes: Arc<dyn CodeGenerator>, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            codes,
            window,
        }
    }

    /// 生产默认配置：系统时钟 + CSPRNG
    pub fn with_window(window: Duration) -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomCodeGenerator), window)
    }

    /// 签发验证码
    ///
    /// 原子地覆盖该标识符已有的条目，每个标识符最多一条在途记录。
    /// 投递是调用方的职责。
    pub fn issue(&self, identifier: &str) -> String {
        let code = self.codes.generate();
        let expires_at = self.clock.now() + self.window;

        self.entries.insert(
            identifier.to_string(),
            VerificationEntry {
                code: code.clone(),
                expires_at,
            },
        );

        code
    }

    /// 校验并消费验证码
    ///
    /// 成功恰好一次：匹配即删除条目，二次提交同一验证码得到
    /// `NotRequested`。不匹配保留条目，窗口内可重试。
    pub fn verify(&self, identifier: &str, submitted: &str) -> Result<(), VerificationError> {
        match self.entries.entry(identifier.to_string()) {
            Entry::Occupied(occupied) => {
                let entry = occupied.get();

                // 过期检查先于比对：过期条目无论提交什么都清除
                if self.clock.now() > entry.expires_at {
                    occupied.remove();
                    return Err(VerificationError::Expired);
                }

                if entry.code != submitted {
                    return Err(VerificationError::Mismatch);
                }

                occupied.remove();
                Ok(())
            }
            Entry::Vacant(_) => Err(VerificationError::NotRequested),
        }
    }

    /// 清除所有已过期条目，返回清除数量
    ///
    /// 可选的周期性清扫；不改变 issue/verify 的可观测语义。
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.expires_at);
        before - self.entries.len()
    }

    /// 在途条目数量
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// 验证窗口时长
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// 可手动推进的测试时钟
    struct MockClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl MockClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Utc::now()),
            })
        }

        fn advance(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += duration;
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    /// 递增序列生成器，保证每次签发的验证码不同
    struct SequenceCodes(AtomicU32);

    impl CodeGenerator for SequenceCodes {
        fn generate(&self) -> String {
            format!("{:06}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn store_with_clock(clock: Arc<MockClock>) -> VerificationStore {
        VerificationStore::new(
            clock,
            Arc::new(SequenceCodes(AtomicU32::new(0))),
            Duration::minutes(5),
        )
    }

    #[test]
    fn test_verify_succeeds_exactly_once() {
        let store = store_with_clock(MockClock::new());

        let code = store.issue("alice@example.com");
        assert_eq!(store.verify("alice@example.com", &code), Ok(()));

        // 成功即消费，二次提交视为未申请
        assert_eq!(
            store.verify("alice@example.com", &code),
            Err(VerificationError::NotRequested)
        );
    }

    #[test]
    fn test_verify_without_issue_is_not_requested() {
        let store = store_with_clock(MockClock::new());

        assert_eq!(
            store.verify("nobody@example.com", "000000"),
            Err(VerificationError::NotRequested)
        );
    }

    #[test]
    fn test_mismatch_keeps_entry_for_retry() {
        let store = store_with_clock(MockClock::new());

        let code = store.issue("alice@example.com");
        assert_eq!(
            store.verify("alice@example.com", "999999"),
            Err(VerificationError::Mismatch)
        );

        // 窗口内重试正确的验证码仍然成功
        assert_eq!(store.verify("alice@example.com", &code), Ok(()));
    }

    #[test]
    fn test_expired_code_is_removed_on_read() {
        let clock = MockClock::new();
        let store = store_with_clock(clock.clone());

        let code = store.issue("alice@example.com");
        clock.advance(Duration::minutes(5) + Duration::seconds(1));

        assert_eq!(
            store.verify("alice@example.com", &code),
            Err(VerificationError::Expired)
        );
        // 过期读取已清除条目
        assert_eq!(
            store.verify("alice@example.com", &code),
            Err(VerificationError::NotRequested)
        );
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn test_reissue_overwrites_previous_entry() {
        let store = store_with_clock(MockClock::new());

        let old = store.issue("alice@example.com");
        let new = store.issue("alice@example.com");
        assert_ne!(old, new);
        assert_eq!(store.pending(), 1);

        // 旧验证码不再匹配，新验证码成功
        assert_eq!(
            store.verify("alice@example.com", &old),
            Err(VerificationError::Mismatch)
        );
        assert_eq!(store.verify("alice@example.com", &new), Ok(()));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let store = store_with_clock(MockClock::new());

        let alice = store.issue("alice@example.com");
        let bob = store.issue("bob@example.com");

        assert_eq!(store.verify("bob@example.com", &bob), Ok(()));
        assert_eq!(store.verify("alice@example.com", &alice), Ok(()));
    }

    #[test]
    fn test_evict_expired_removes_only_stale_entries() {
        let clock = MockClock::new();
        let store = store_with_clock(clock.clone());

        store.issue("stale@example.com");
        clock.advance(Duration::minutes(6));
        let fresh = store.issue("fresh@example.com");

        assert_eq!(store.evict_expired(), 1);
        assert_eq!(store.pending(), 1);
        assert_eq!(store.verify("fresh@example.com", &fresh), Ok(()));
    }

    #[test]
    fn test_concurrent_issue_leaves_single_entry() {
        let store = Arc::new(store_with_clock(MockClock::new()));

        let codes: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = Arc::clone(&store);
                    scope.spawn(move || store.issue("alice@example.com"))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.pending(), 1);

        // 最后写入者胜出：所有返回的验证码中恰好一个可用
        let successes = codes
            .iter()
            .filter(|code| store.verify("alice@example.com", code.as_str()).is_ok())
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn test_random_generator_emits_six_digits() {
        let generator = RandomCodeGenerator;

        let codes: Vec<String> = (0..100).map(|_| generator.generate()).collect();
        for code in &codes {
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }

        // 应具备随机性（不全相同）
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert!(unique.len() > 1);
    }
}
