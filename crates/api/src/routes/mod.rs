//! HTTP route definitions.
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | POST | /auth/register | - | Register with email and password |
//! | POST | /auth/login | - | Login with email and password |
//! | POST | /auth/google | - | Login with a Google ID token |
//! | GET | /auth/me | user | Current user's profile |
//! | GET | /produtos | - | List active products (filters, pagination) |
//! | GET | /produtos/{id} | - | Get one active product |
//! | POST | /produtos | admin | Create a product |
//! | PUT | /produtos/{id} | admin | Partially update a product |
//! | DELETE | /produtos/{id} | admin | Deactivate a product |
//! | GET | /carrinho | user | Priced cart view |
//! | POST | /carrinho/adicionar | user | Add a product to the cart |
//! | PUT | /carrinho/item/{id} | user | Change a line's quantity |
//! | DELETE | /carrinho/item/{id} | user | Remove a line |
//! | DELETE | /carrinho/limpar | user | Empty the cart |
//! | GET | /cep/{cep} | - | Address lookup by CEP |
//! | POST | /frete/calcular | user | Shipping quote for the current cart |
//! | POST | /pagamento/mercadopago | user | Checkout: create order + payment |
//! | GET | /pedidos | user | Current user's order history |
//! | GET | /pedidos/{id} | user | One of the current user's orders |
//! | POST | /webhook/mercadopago | - | Payment status notifications |
//! | GET | /usuario/perfil | user | Profile |
//! | PUT | /usuario/perfil | user | Partial profile update |
//! | POST | /usuario/upload-foto | user | Profile photo upload |

pub mod auth;
pub mod carrinho;
pub mod frete;
pub mod pagamento;
pub mod pedidos;
pub mod produtos;
pub mod usuario;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Compose all API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/produtos", produtos::router())
        .nest("/carrinho", carrinho::router())
        .merge(frete::router())
        .nest("/pagamento", pagamento::router())
        .nest("/pedidos", pedidos::router())
        .nest("/webhook", webhook::router())
        .nest("/usuario", usuario::router())
}
