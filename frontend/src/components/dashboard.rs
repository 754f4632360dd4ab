//! 控制面板页面
//!
//! 展示运行统计摘要，每 60 秒自动刷新一次。
//! 请求返回时如果会话已被注销，结果直接丢弃（见 load_stats）。

use leptos::prelude::*;
use leptos::task::spawn_local;
use panoptic_shared::StatsSummary;
use panoptic_shared::protocol::StatsRequest;

use super::icons::{Activity, RefreshCw, UsersIcon};
use super::nav::NavBar;
use crate::api::{ApiError, PanopticApi};
use crate::session::use_session;
use crate::web::Interval;

/// 自动刷新间隔（毫秒）
const REFRESH_INTERVAL_MS: u32 = 60_000;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();

    let (stats, set_stats) = signal(Option::<StatsSummary>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load_stats = {
        let session = session.clone();
        move || {
            let Some(token) = session.snapshot().token else {
                return;
            };
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                let api = PanopticApi::authorized(token);
                match api.send(&StatsRequest).await {
                    Ok(data) => {
                        // 会话在请求途中被注销：丢弃过期结果
                        if session.snapshot().is_authenticated {
                            set_stats.try_set(Some(data));
                            set_error_msg.try_set(None);
                        }
                    }
                    Err(ApiError::Unauthorized) => session.logout(),
                    Err(e) => {
                        set_error_msg.try_set(Some(format!("加载统计失败: {}", e)));
                    }
                }
                set_loading.try_set(false);
            });
        }
    };

    // 初始加载
    {
        let load_stats = load_stats.clone();
        Effect::new(move |_| {
            load_stats();
        });
    }

    // 周期刷新；StoredValue 随组件卸载一起清理，定时器随之取消
    {
        let load_stats = load_stats.clone();
        let _refresh = StoredValue::new_local(Interval::new(REFRESH_INTERVAL_MS, move || {
            load_stats();
        }));
    }

    let stat = move |f: fn(&StatsSummary) -> u64| move || stats.get().map(|s| f(&s)).unwrap_or(0);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <NavBar />

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="text-2xl font-bold">"运行概览"</h2>
                        <p class="text-base-content/70 text-sm">"每分钟自动刷新。"</p>
                    </div>
                    <button
                        on:click=move |_| load_stats()
                        disabled=move || loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-figure text-primary">
                            <UsersIcon attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"用户总数"</div>
                        <div class="stat-value text-primary">{stat(|s| s.total_users)}</div>
                    </div>

                    <div class="stat">
                        <div class="stat-figure text-success">
                            <Activity attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"活跃会话"</div>
                        <div class="stat-value text-success">{stat(|s| s.active_sessions)}</div>
                    </div>

                    <div class="stat">
                        <div class="stat-title">"24 小时请求"</div>
                        <div class="stat-value text-secondary">{stat(|s| s.requests_24h)}</div>
                    </div>

                    <div class="stat">
                        <div class="stat-title">"运行时长"</div>
                        <div class="stat-value text-2xl">
                            {move || stats.get().map(|s| s.uptime_label()).unwrap_or_else(|| "--".to_string())}
                        </div>
                        <div class="stat-desc">"自上次部署起"</div>
                    </div>
                </div>
            </div>
        </div>
    }
}
