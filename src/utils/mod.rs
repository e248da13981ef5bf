use std::future::Future;
use std::time::Duration;

pub mod header;
pub mod method;
pub mod status;

/// `fut` を `dur` 以内に終わらせる
/// 時間切れなら `Err(())`、中断された future はその場で drop される
pub async fn with_timeout<F, T>(fut: F, dur: Duration) -> Result<T, ()>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(dur, fut).await.map_err(|_elapsed| ())
}
