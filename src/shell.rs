//! Line commands for the terminal storefront.
//!
//! ```text
//! products [page=N] [sort=price-low] [category=..] [size=..] [search words]
//! add <id> [qty] [size=..] [color=..]
//! remove <id> | qty <id> <n>
//! cart | open | close | toggle
//! wish <id> | wishlist | toasts
//! checkout <standard|express> <cod|banking|momo|zalopay> name|email|phone|address|city|district|ward[|notes]
//! clear [wishlist|toasts] | help | quit
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::catalog::{CatalogQuery, SortOrder};
use crate::checkout::CheckoutRequest;
use crate::domain::aggregates::{CustomerInfo, PaymentMethod, ShippingMethod, UnknownOption};
use crate::domain::value_objects::ProductId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("unknown command {0:?}; try `help`")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a number")]
    InvalidNumber(String),
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    #[error("expected 7 or 8 `|`-separated customer fields, got {0}")]
    CustomerFields(usize),
}

impl From<UnknownOption> for ShellError {
    fn from(e: UnknownOption) -> Self { Self::UnknownOption(e.0) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearTarget {
    Cart,
    Wishlist,
    Toasts,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Products(CatalogQuery),
    Add { id: ProductId, quantity: Option<u32>, size: Option<String>, color: Option<String> },
    Remove(ProductId),
    Quantity { id: ProductId, quantity: i64 },
    ShowCart,
    OpenCart,
    CloseCart,
    ToggleCart,
    Wish(ProductId),
    ShowWishlist,
    ShowToasts,
    Checkout(CheckoutRequest),
    Clear(ClearTarget),
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match name {
            "" => return Ok(None),
            "products" | "ls" => Self::Products(parse_query(rest)?),
            "add" => {
                let id = number(args.next(), "product id")?;
                let mut add = (None, None, None);
                for arg in args {
                    match arg.split_once('=') {
                        Some(("size", v)) => add.1 = Some(v.to_string()),
                        Some(("color", v)) => add.2 = Some(v.to_string()),
                        Some(_) => return Err(ShellError::UnknownOption(arg.to_string())),
                        None => add.0 = Some(number(Some(arg), "quantity")?),
                    }
                }
                Self::Add { id, quantity: add.0, size: add.1, color: add.2 }
            }
            "remove" | "rm" => Self::Remove(number(args.next(), "product id")?),
            "qty" => Self::Quantity { id: number(args.next(), "product id")?, quantity: number(args.next(), "quantity")? },
            "cart" => Self::ShowCart,
            "open" => Self::OpenCart,
            "close" => Self::CloseCart,
            "toggle" => Self::ToggleCart,
            "wish" => Self::Wish(number(args.next(), "product id")?),
            "wishlist" => Self::ShowWishlist,
            "toasts" => Self::ShowToasts,
            "checkout" => Self::Checkout(parse_checkout(rest)?),
            "clear" => Self::Clear(match args.next() {
                None | Some("cart") => ClearTarget::Cart,
                Some("wishlist") => ClearTarget::Wishlist,
                Some("toasts") => ClearTarget::Toasts,
                Some(other) => return Err(ShellError::UnknownOption(other.to_string())),
            }),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn number<T: FromStr>(arg: Option<&str>, what: &'static str) -> Result<T, ShellError> {
    let arg = arg.ok_or(ShellError::MissingArgument(what))?;
    arg.parse().map_err(|_| ShellError::InvalidNumber(arg.to_string()))
}

fn parse_query(rest: &str) -> Result<CatalogQuery, ShellError> {
    let mut query = CatalogQuery { page: 1, ..CatalogQuery::default() };
    let mut words = vec![];
    for arg in rest.split_whitespace() {
        match arg.split_once('=') {
            Some(("page", v)) => query.page = number(Some(v), "page")?,
            Some(("sort", v)) => query.sort = SortOrder::from_str(v)?,
            Some(("category", v)) => query.category = Some(v.replace('_', " ")),
            Some(("size", v)) => query.sizes.push(v.to_string()),
            _ => words.push(arg),
        }
    }
    query.search = words.join(" ");
    Ok(query)
}

fn parse_checkout(rest: &str) -> Result<CheckoutRequest, ShellError> {
    let mut parts = rest.splitn(3, char::is_whitespace);
    let shipping: ShippingMethod = parts.next().filter(|s| !s.is_empty()).ok_or(ShellError::MissingArgument("shipping method"))?.parse()?;
    let payment: PaymentMethod = parts.next().ok_or(ShellError::MissingArgument("payment method"))?.parse()?;
    let fields: Vec<String> = parts.next()
        .ok_or(ShellError::MissingArgument("customer details"))?
        .split('|')
        .map(|f| f.trim().to_string())
        .collect();
    let [full_name, email, phone, address, city, district, ward, notes @ ..] = fields.as_slice() else {
        return Err(ShellError::CustomerFields(fields.len()));
    };
    if notes.len() > 1 {
        return Err(ShellError::CustomerFields(fields.len()));
    }
    Ok(CheckoutRequest {
        customer: CustomerInfo {
            full_name: full_name.clone(), email: email.clone(), phone: phone.clone(), address: address.clone(),
            city: city.clone(), district: district.clone(), ward: ward.clone(),
            notes: notes.first().filter(|n| !n.is_empty()).cloned(),
        },
        shipping,
        payment,
        agree_terms: true,
    })
}
