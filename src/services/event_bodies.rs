//! Synthetic payment-provider event payloads used by the reseed tool.

use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, seq::SliceRandom, Rng, RngCore};
use serde_json::{json, Value as JsonValue};

pub const EVENT_TYPES: &[&str] = &[
    "payment_intent.succeeded",
    "payment_intent.created",
    "payment_intent.payment_failed",
    "charge.succeeded",
    "charge.failed",
    "charge.refunded",
    "customer.created",
    "customer.updated",
    "customer.deleted",
    "customer.subscription.created",
    "customer.subscription.updated",
    "customer.subscription.deleted",
    "customer.subscription.trial_will_end",
    "invoice.created",
    "invoice.payment_succeeded",
    "invoice.payment_failed",
    "invoice.finalized",
    "checkout.session.completed",
    "checkout.session.expired",
    "payment_method.attached",
    "payment_method.detached",
    "payout.created",
    "payout.paid",
    "payout.failed",
    "refund.created",
    "refund.updated",
];

const CURRENCIES: &[&str] = &["usd", "eur", "brl"];
const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Felipe", "Grace", "Hugo", "Iris", "Jonas",
];
const LAST_NAMES: &[&str] = &[
    "Almeida", "Barros", "Costa", "Duarte", "Evans", "Fischer", "Garcia", "Hansen", "Ito",
];
const PRODUCTS: &[&str] = &[
    "Ergonomic Steel Chair",
    "Handcrafted Cotton Shirt",
    "Refined Granite Keyboard",
    "Sleek Bamboo Lamp",
    "Rustic Wooden Table",
];
const CATCH_PHRASES: &[&str] = &[
    "Customer-focused zero tolerance framework",
    "Streamlined asynchronous capability",
    "Distributed real-time paradigm",
    "Seamless mission-critical pipeline",
];
const DOMAINS: &[&str] = &["example.com", "shop.test", "payments.dev", "acme.io", "store.local"];

/// Builds the `data.object` part of one event category.
pub trait BodyGenerator: Send + Sync {
    /// Event-type prefix this generator answers for, e.g. `"charge"`.
    fn category(&self) -> &'static str;

    fn object(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue;
}

/// Dispatches event types to their category generator; unknown categories get a
/// minimal object.
pub struct EventCatalogue {
    generators: Vec<Box<dyn BodyGenerator>>,
}

impl Default for EventCatalogue {
    fn default() -> Self {
        Self {
            generators: vec![
                Box::new(PaymentIntentEvents),
                Box::new(ChargeEvents),
                Box::new(CustomerEvents),
                Box::new(InvoiceEvents),
                Box::new(CheckoutSessionEvents),
                Box::new(PayoutEvents),
                Box::new(RefundEvents),
            ],
        }
    }
}

impl EventCatalogue {
    pub fn random_event_type(&self, rng: &mut dyn RngCore) -> &'static str {
        EVENT_TYPES.choose(rng).copied().unwrap_or("charge.succeeded")
    }

    pub fn body(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        let object = match self
            .generators
            .iter()
            .find(|g| event_type.starts_with(g.category()))
        {
            Some(generator) => generator.object(event_type, rng),
            None => json!({
                "id": alnum(rng, 24),
                "object": event_type.split('.').next().unwrap_or(event_type),
            }),
        };

        let created = Utc::now() - Duration::seconds(rng.gen_range(0..30 * 24 * 3600));
        json!({
            "id": format!("evt_{}", alnum(rng, 24)),
            "object": "event",
            "api_version": "2023-10-16",
            "created": created.timestamp(),
            "type": event_type,
            "livemode": rng.gen_bool(0.5),
            "pending_webhooks": rng.gen_range(0..=3),
            "request": {
                "id": format!("req_{}", alnum(rng, 24)),
                "idempotency_key": uuid_from(rng),
            },
            "data": { "object": object },
        })
    }
}

struct PaymentIntentEvents;

impl BodyGenerator for PaymentIntentEvents {
    fn category(&self) -> &'static str {
        "payment_intent"
    }

    fn object(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        json!({
            "id": format!("pi_{}", alnum(rng, 24)),
            "object": "payment_intent",
            "amount": rng.gen_range(1000..=100_000),
            "currency": pick(rng, CURRENCIES),
            "status": outcome(event_type, "succeeded", "failed", "requires_payment_method"),
            "customer": format!("cus_{}", alnum(rng, 14)),
            "description": pick(rng, PRODUCTS),
            "metadata": {
                "order_id": uuid_from(rng),
                "customer_name": full_name(rng),
            },
        })
    }
}

struct ChargeEvents;

impl BodyGenerator for ChargeEvents {
    fn category(&self) -> &'static str {
        "charge"
    }

    fn object(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        let status = if event_type.contains("succeeded") {
            "succeeded"
        } else {
            "failed"
        };
        json!({
            "id": format!("ch_{}", alnum(rng, 24)),
            "object": "charge",
            "amount": rng.gen_range(1000..=100_000),
            "currency": pick(rng, CURRENCIES),
            "status": status,
            "customer": format!("cus_{}", alnum(rng, 14)),
            "description": pick(rng, PRODUCTS),
            "receipt_email": email(rng),
        })
    }
}

struct CustomerEvents;

impl BodyGenerator for CustomerEvents {
    fn category(&self) -> &'static str {
        "customer"
    }

    fn object(&self, _event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        json!({
            "id": format!("cus_{}", alnum(rng, 14)),
            "object": "customer",
            "email": email(rng),
            "name": full_name(rng),
            "phone": format!("+1-555-{:03}-{:04}", rng.gen_range(0..1000), rng.gen_range(0..10_000)),
            "description": pick(rng, CATCH_PHRASES),
            "metadata": { "user_id": uuid_from(rng) },
        })
    }
}

struct InvoiceEvents;

impl BodyGenerator for InvoiceEvents {
    fn category(&self) -> &'static str {
        "invoice"
    }

    fn object(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        let amount_paid = if event_type.contains("succeeded") {
            rng.gen_range(1000..=50_000)
        } else {
            0
        };
        json!({
            "id": format!("in_{}", alnum(rng, 24)),
            "object": "invoice",
            "amount_due": rng.gen_range(1000..=50_000),
            "amount_paid": amount_paid,
            "currency": pick(rng, CURRENCIES),
            "customer": format!("cus_{}", alnum(rng, 14)),
            "status": outcome(event_type, "paid", "open", "draft"),
            "subscription": format!("sub_{}", alnum(rng, 14)),
        })
    }
}

struct CheckoutSessionEvents;

impl BodyGenerator for CheckoutSessionEvents {
    fn category(&self) -> &'static str {
        "checkout.session"
    }

    fn object(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        let completed = event_type.contains("completed");
        json!({
            "id": format!("cs_{}", alnum(rng, 24)),
            "object": "checkout.session",
            "amount_total": rng.gen_range(1000..=100_000),
            "currency": pick(rng, CURRENCIES),
            "customer": format!("cus_{}", alnum(rng, 14)),
            "customer_email": email(rng),
            "payment_status": if completed { "paid" } else { "unpaid" },
            "status": if completed { "complete" } else { "expired" },
            "mode": pick(rng, &["payment", "subscription", "setup"]),
        })
    }
}

struct PayoutEvents;

impl BodyGenerator for PayoutEvents {
    fn category(&self) -> &'static str {
        "payout"
    }

    fn object(&self, event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        let arrival = Utc::now() + Duration::seconds(rng.gen_range(3600..365 * 24 * 3600));
        json!({
            "id": format!("po_{}", alnum(rng, 24)),
            "object": "payout",
            "amount": rng.gen_range(10_000..=1_000_000),
            "currency": pick(rng, CURRENCIES),
            "status": outcome(event_type, "paid", "failed", "pending"),
            "arrival_date": arrival.timestamp(),
            "method": "standard",
        })
    }
}

struct RefundEvents;

impl BodyGenerator for RefundEvents {
    fn category(&self) -> &'static str {
        "refund"
    }

    fn object(&self, _event_type: &str, rng: &mut dyn RngCore) -> JsonValue {
        json!({
            "id": format!("re_{}", alnum(rng, 24)),
            "object": "refund",
            "amount": rng.gen_range(1000..=50_000),
            "currency": pick(rng, CURRENCIES),
            "charge": format!("ch_{}", alnum(rng, 24)),
            "reason": pick(rng, &["duplicate", "fraudulent", "requested_by_customer"]),
            "status": "succeeded",
        })
    }
}

/// `success` for succeeded/paid events, `failure` for failed ones, else `pending`.
fn outcome(
    event_type: &str,
    success: &'static str,
    failure: &'static str,
    pending: &'static str,
) -> &'static str {
    if event_type.contains("succeeded") || event_type.ends_with(".paid") {
        success
    } else if event_type.contains("failed") {
        failure
    } else {
        pending
    }
}

pub fn alnum(rng: &mut dyn RngCore, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn hex(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

pub fn pick(rng: &mut dyn RngCore, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

pub fn domain(rng: &mut dyn RngCore) -> String {
    format!("{}.{}", alnum(rng, 6).to_lowercase(), pick(rng, DOMAINS))
}

pub fn ipv4(rng: &mut dyn RngCore) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(1..=223),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(1..=254)
    )
}

fn full_name(rng: &mut dyn RngCore) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

fn email(rng: &mut dyn RngCore) -> String {
    format!(
        "{}.{}@{}",
        pick(rng, FIRST_NAMES).to_lowercase(),
        pick(rng, LAST_NAMES).to_lowercase(),
        pick(rng, DOMAINS)
    )
}

fn uuid_from(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}
