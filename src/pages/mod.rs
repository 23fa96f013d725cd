use crate::components::RemoteSearch;
use crate::models::{SearchSource, Selection};
use leptos::prelude::*;

/// One item row of a job order. Each row owns its own lookup control.
#[derive(Clone)]
pub(crate) struct JobOrderLine {
    pub key: u64,
    pub item: RwSignal<Selection>,
    pub unit: RwSignal<String>,
    pub unit_price: RwSignal<Option<f64>>,
}

impl JobOrderLine {
    fn new(key: u64) -> Self {
        Self {
            key,
            item: RwSignal::new(Selection::default()),
            unit: RwSignal::new(String::new()),
            unit_price: RwSignal::new(None),
        }
    }

    /// Copies the picked item's unit and price; clearing resets both.
    fn apply_item(&self, selection: Selection) {
        let unit = selection
            .raw
            .as_ref()
            .and_then(|o| o.attr_str("unit"))
            .unwrap_or_default();
        let price = selection.raw.as_ref().and_then(|o| o.attr_f64("price"));

        self.unit.set(unit);
        self.unit_price.set(price);
        self.item.set(selection);
    }
}

pub(crate) fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn selection_value(sel: RwSignal<Selection>) -> Signal<String> {
    Signal::derive(move || sel.with(|s| s.value.clone()))
}

fn selection_label(sel: RwSignal<Selection>) -> Signal<String> {
    Signal::derive(move || sel.with(|s| s.display_label.clone()))
}

#[component]
pub fn JobOrderPage() -> impl IntoView {
    let customer: RwSignal<Selection> = RwSignal::new(Selection::default());
    let expense_account: RwSignal<Selection> = RwSignal::new(Selection::default());

    let next_key = StoredValue::new(1_u64);
    let lines: RwSignal<Vec<JobOrderLine>> = RwSignal::new(vec![JobOrderLine::new(0)]);

    let add_line = move |_: web_sys::MouseEvent| {
        let key = next_key.get_value();
        next_key.set_value(key + 1);
        lines.update(|ls| ls.push(JobOrderLine::new(key)));
    };

    let remove_line = move |key: u64| {
        lines.update(|ls| ls.retain(|l| l.key != key));
    };

    view! {
        <div class="mx-auto max-w-4xl px-4 py-8 space-y-6">
            <h1 class="text-lg font-semibold">"Job order"</h1>

            <div class="grid grid-cols-1 gap-4 md:grid-cols-2">
                <label class="space-y-1 text-sm">
                    <span class="text-muted-foreground">"Customer"</span>
                    <RemoteSearch
                        source=SearchSource::customers()
                        value=selection_value(customer)
                        display_name=selection_label(customer)
                        on_change=move |sel: Selection| customer.set(sel)
                        placeholder="Search customer..."
                    />
                </label>

                <label class="space-y-1 text-sm">
                    <span class="text-muted-foreground">"Expense account"</span>
                    <RemoteSearch
                        source=SearchSource::ledger_accounts(Some("expense"))
                        value=selection_value(expense_account)
                        display_name=selection_label(expense_account)
                        on_change=move |sel: Selection| expense_account.set(sel)
                        placeholder="Search account..."
                    />
                </label>
            </div>

            <table class="w-full text-sm">
                <thead>
                    <tr class="text-left text-muted-foreground">
                        <th class="py-2">"Item"</th>
                        <th class="py-2 w-24">"Unit"</th>
                        <th class="py-2 w-32 text-right">"Price"</th>
                        <th class="py-2 w-10"></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || lines.get()
                        key=|line| line.key
                        children=move |line: JobOrderLine| {
                            let key = line.key;
                            let item = line.item;
                            let unit = line.unit;
                            let unit_price = line.unit_price;
                            let on_item = move |sel: Selection| line.apply_item(sel);
                            view! {
                                <tr class="border-t">
                                    <td class="py-2 pr-2">
                                        <RemoteSearch
                                            source=SearchSource::items()
                                            value=selection_value(item)
                                            display_name=selection_label(item)
                                            on_change=on_item
                                            placeholder="Search item..."
                                        />
                                    </td>
                                    <td class="py-2">{move || unit.get()}</td>
                                    <td class="py-2 text-right tabular-nums">
                                        {move || format_amount(unit_price.get())}
                                    </td>
                                    <td class="py-2 text-right">
                                        <button
                                            type="button"
                                            class="text-muted-foreground hover:text-destructive"
                                            aria-label="Remove line"
                                            on:click=move |_| remove_line(key)
                                        >
                                            "×"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <button
                type="button"
                class="h-9 rounded-md border border-input px-4 text-sm hover:bg-accent"
                on:click=add_line
            >
                "Add line"
            </button>
        </div>
    }
}
