//! 用户列表页面

use leptos::prelude::*;
use leptos::task::spawn_local;
use panoptic_shared::User;
use panoptic_shared::protocol::ListUsersRequest;

use super::icons::RefreshCw;
use super::nav::NavBar;
use crate::api::{ApiError, PanopticApi};
use crate::session::use_session;

fn last_login_label(user: &User) -> String {
    user.last_login
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "从未".to_string())
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let session = use_session();

    let (users, set_users) = signal(Vec::<User>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load_users = {
        let session = session.clone();
        move || {
            let Some(token) = session.snapshot().token else {
                return;
            };
            let session = session.clone();
            set_loading.set(true);
            spawn_local(async move {
                let api = PanopticApi::authorized(token);
                match api.send(&ListUsersRequest).await {
                    Ok(list) => {
                        // 丢弃注销后才返回的过期结果
                        if session.snapshot().is_authenticated {
                            set_users.try_set(list);
                            set_error_msg.try_set(None);
                        }
                    }
                    Err(ApiError::Unauthorized) => session.logout(),
                    Err(e) => {
                        set_error_msg.try_set(Some(format!("加载用户失败: {}", e)));
                    }
                }
                set_loading.try_set(false);
            });
        }
    };

    // 初始加载
    {
        let load_users = load_users.clone();
        Effect::new(move |_| {
            load_users();
        });
    }

    let total = move || users.with(|u| u.len());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <NavBar />

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex items-center justify-between p-6 pb-2">
                            <div>
                                <h3 class="card-title">"用户"</h3>
                                <p class="text-base-content/70 text-sm">
                                    "共 " {total} " 个账号。"
                                </p>
                            </div>
                            <button
                                on:click=move |_| load_users()
                                disabled=move || loading.get()
                                class="btn btn-ghost btn-circle"
                            >
                                <RefreshCw attr:class=move || {
                                    if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                                } />
                            </button>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"姓名"</th>
                                        <th>"邮箱"</th>
                                        <th class="hidden md:table-cell">"角色"</th>
                                        <th class="hidden md:table-cell">"最近登录"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || total() == 0 && !loading.get()>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "暂无用户。"
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || loading.get() && total() == 0>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span>
                                                " 加载中..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || users.get()
                                        key=|u| u.id.clone()
                                        children=move |user| {
                                            let login_label = last_login_label(&user);
                                            view! {
                                                <tr>
                                                    <td class="font-bold">{user.display_name}</td>
                                                    <td class="font-mono text-sm opacity-70">{user.email}</td>
                                                    <td class="hidden md:table-cell">
                                                        <div class="badge badge-accent badge-outline">
                                                            {user.role.label()}
                                                        </div>
                                                    </td>
                                                    <td class="hidden md:table-cell font-mono text-xs opacity-50">
                                                        {login_label}
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
