//! 顶层兜底屏幕
//!
//! 屏幕按需加载失败时的最终呈现：只提供"重试"（重新挂载）
//! 与"重新加载"（整体重启）两个出口，不恢复失败时的导航上下文。

use leptos::prelude::*;

use super::icons::AlertTriangle;

#[component]
pub fn FailurePage(
    /// 失败原因描述
    message: String,
    /// 清除失败状态并重新挂载当前屏幕
    on_retry: Callback<()>,
) -> impl IntoView {
    let reload = move |_| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card bg-base-100 shadow-xl w-full max-w-md">
                <div class="card-body items-center text-center">
                    <AlertTriangle attr:class="h-10 w-10 text-error" />
                    <h2 class="card-title">"页面加载出错"</h2>
                    <p class="text-base-content/70">{message}</p>
                    <div class="card-actions mt-4">
                        <button class="btn btn-primary" on:click=move |_| on_retry.run(())>
                            "重试"
                        </button>
                        <button class="btn btn-ghost" on:click=reload>
                            "重新加载应用"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
