use std::io;
use std::time::Duration;

use anyhow::{Context, Result};

use fivey_api::endpoints::catalog::Item;
use fivey_api::endpoints::stores::Store;
use fivey_api::{Api, ApiError, Client};
use fivey_auth::{Session, Settings};

use crate::geo::{self, Location};
use crate::screen::{self, Choice};

const MAIN_MENU: &str = "1. Каталог\n\
    2. Поиск\n\
    3. Корзина\n\
    4. Заказать\n\
    9. Мои заказы\n\
    0. Сменить адрес\n\
    q. Выход";

pub struct App {
    api: Client,
    http: reqwest::Client,
    location: Location,
    store: Store,
    order: fivey_api::endpoints::orders::Order,
}

impl App {
    /// Resolve a delivery address (latest order first, free-form prompt
    /// as the fallback), bind a store to it and open a draft order.
    pub async fn start(session: Session, settings: &Settings) -> Result<Self> {
        let api = Client::with_base_url(&session, settings.commerce_url.clone());
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        let previous = api.send(Api::orders().list().limit(1u32)).await?;
        let query = match previous.items.first().and_then(|order| order.address.clone()) {
            Some(address) => address.to_string(),
            None => screen::prompt("Введите произвольный адрес: ")?,
        };

        let (location, store) = resolve_store(&api, &http, &query).await?;
        let order = api
            .send(Api::orders().create(&store, &location.address, location.lat, location.lon))
            .await?;
        tracing::info!(order_id = %order.id, store = %store.code, "draft order created");

        Ok(Self {
            api,
            http,
            location,
            store,
            order,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let cols = screen::term_cols();
            print!("{}", screen::frame(&self.header(cols), MAIN_MENU, cols));
            match screen::read_choice("123490q")? {
                '1' => self.browse_catalog().await?,
                '2' => self.search().await?,
                '3' => self.edit_basket().await?,
                '4' => self.checkout().await?,
                '9' => self.order_history().await?,
                '0' => self.change_address().await?,
                'q' => return Ok(()),
                _ => {}
            }
        }
    }

    fn header(&self, cols: usize) -> String {
        let address = self
            .order
            .address
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "Неизвестно".to_string());
        screen::left_right(&address, &format!("{} руб", self.order.total_sum), cols)
    }

    async fn browse_catalog(&mut self) -> Result<()> {
        let catalog = Api::catalog(self.store.code.clone());
        let categories = self.api.send(catalog.categories()).await?;

        let header = self.header(screen::term_cols());
        let Some(index) = self.pick(&header, &categories, |category, idx, _| {
            format!("{idx}. {}", category.name)
        })?
        else {
            return Ok(());
        };

        let subcategories = categories[index].subcategories.clone();
        let Some(index) = self.pick(&header, &subcategories, |subcategory, idx, _| {
            format!("{idx}. {}", subcategory.name)
        })?
        else {
            return Ok(());
        };

        let page = self
            .api
            .send(catalog.products(subcategories[index].id.clone()))
            .await?;
        self.select_items_into_basket(&page.products).await
    }

    async fn search(&mut self) -> Result<()> {
        let query = screen::prompt("Искать: ")?;
        let page = self
            .api
            .send(Api::catalog(self.store.code.clone()).search(query))
            .await?;
        self.select_items_into_basket(&page.products).await
    }

    async fn select_items_into_basket(&mut self, items: &[Item]) -> Result<()> {
        loop {
            let header = self.header(screen::term_cols());
            let Some(index) = self.pick(&header, items, item_line)? else {
                return Ok(());
            };
            let item = items[index].clone();
            self.basket_put(&item).await?;
        }
    }

    /// Mirror of the mobile app's add-to-basket: a PLU already in the
    /// basket accumulates quantity through the PUT path, anything else
    /// goes through POST. Either way the backend answers with the whole
    /// updated order.
    async fn basket_put(&mut self, item: &Item) -> Result<(), ApiError> {
        let basket = Api::basket(self.order.id.clone());
        let updated = match self.order.basket.iter().find(|i| i.plu == item.plu) {
            Some(existing) => {
                self.api
                    .send(basket.set_quantity(item, existing.quantity + item.quantity))
                    .await?
            }
            None => self.api.send(basket.add(item)).await?,
        };
        self.order = updated;
        Ok(())
    }

    async fn edit_basket(&mut self) -> Result<()> {
        loop {
            let items = self.order.basket.clone();
            let header = self.header(screen::term_cols());
            let Some(index) = self.pick(&header, &items, item_line)? else {
                return Ok(());
            };
            self.order = self
                .api
                .send(Api::basket(self.order.id.clone()).remove(items[index].plu))
                .await?;
        }
    }

    async fn checkout(&mut self) -> Result<()> {
        let flat = screen::prompt("Квартира: ")?;
        let comment = screen::prompt("Комментарий: ")?;

        self.order = self
            .api
            .send(
                Api::orders()
                    .address_details(self.order.id.clone())
                    .flat(flat)
                    .comment(comment),
            )
            .await?;
        self.api
            .send(Api::orders().revise(self.order.id.clone()))
            .await?;

        let cards = self.api.send(Api::cards().list()).await?;
        if cards.items.is_empty() {
            println!("Нет привязанных карт!");
            return Ok(());
        }
        let header = self.header(screen::term_cols());
        let Some(index) = self.pick(&header, &cards.items, |card, idx, _| {
            format!("{idx}. {}", card.display_name)
        })?
        else {
            return Ok(());
        };

        self.api
            .send(Api::orders().pay(self.order.id.clone(), &cards.items[index]))
            .await?;
        tracing::info!(order_id = %self.order.id, "order paid");
        println!("Заказ оплачен!");

        // Fresh draft for the next purchase
        self.order = self
            .api
            .send(Api::orders().create(
                &self.store,
                &self.location.address,
                self.location.lat,
                self.location.lon,
            ))
            .await?;
        Ok(())
    }

    async fn order_history(&self) -> Result<()> {
        let cols = screen::term_cols();
        let page = self.api.send(Api::orders().list().limit(10u32)).await?;

        let mut lines: Vec<String> = page
            .items
            .iter()
            .map(|order| {
                let address = order
                    .address
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let number = order
                    .human_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "—".to_string());
                screen::left_right(
                    &format!("{number}: {address} ({} руб)", order.total_sum),
                    &order.status.to_string(),
                    cols,
                )
            })
            .collect();
        lines.push(String::new());
        lines.push("b. Назад".to_string());

        print!("{}", screen::frame(&self.header(cols), &lines.join("\n"), cols));
        screen::read_choice("b")?;
        Ok(())
    }

    async fn change_address(&mut self) -> Result<()> {
        let query = screen::prompt("Введите произвольный адрес: ")?;
        match resolve_store(&self.api, &self.http, &query).await {
            Ok((location, store)) => {
                self.order = self
                    .api
                    .send(Api::orders().create(
                        &store,
                        &location.address,
                        location.lat,
                        location.lon,
                    ))
                    .await?;
                self.location = location;
                self.store = store;
            }
            Err(err) => {
                tracing::warn!(%err, "store lookup failed");
                println!("Не удалось найти магазин по этому адресу!");
            }
        }
        Ok(())
    }

    fn pick<T>(
        &self,
        header: &str,
        items: &[T],
        render: impl Fn(&T, char, usize) -> String,
    ) -> io::Result<Option<usize>> {
        match screen::paginate(header, items, render)? {
            Choice::Selected(index) => Ok(Some(index)),
            Choice::Back => Ok(None),
            Choice::Quit => std::process::exit(0),
        }
    }
}

fn item_line(item: &Item, idx: char, cols: usize) -> String {
    screen::left_right(
        &format!("{idx}. {} x{}", item.name, item.quantity),
        &format!("{} / {}", item.price(), item.unit_of_measure),
        cols,
    )
}

async fn resolve_store(
    api: &Client,
    http: &reqwest::Client,
    query: &str,
) -> Result<(Location, Store)> {
    let location = geo::location_by_search(http, query).await?;
    let store = api
        .send(Api::stores().by_location(location.lat, location.lon))
        .await
        .context("store lookup failed for the resolved location")?;
    Ok((location, store))
}
