use crate::domain::model::RequestContext;
use crate::domain::ports::SessionProvider;
use crate::utils::error::Result;

pub const REDIRECT_SIGNED_IN: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// 已登入，不顯示註冊頁
    Redirect { status: u16, location: String },
    /// 顯示空白註冊表單
    Render,
}

/// 註冊頁只給未登入的訪客；查詢失敗直接往外拋
pub async fn load_register_page(
    sessions: &dyn SessionProvider,
    ctx: &RequestContext,
) -> Result<PageLoad> {
    match sessions.get_session(ctx).await? {
        Some(session) => {
            tracing::debug!("Visitor already signed in as {}, redirecting", session.user_id);
            Ok(PageLoad::Redirect {
                status: 302,
                location: REDIRECT_SIGNED_IN.to_string(),
            })
        }
        None => Ok(PageLoad::Render),
    }
}
