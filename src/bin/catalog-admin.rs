use clap::{Arg, ArgMatches, Command};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

use catalog_admin_client::auth::FileTokenStorage;
use catalog_admin_client::config::ClientOptions;
use catalog_admin_client::error::Error;
use catalog_admin_client::search::SearchParams;
use catalog_admin_client::ste::{SteListParams, UploadFile};
use catalog_admin_client::CatalogClient;

fn cli() -> Command<'static> {
    let category = Arg::new("category")
        .long("category")
        .short('c')
        .value_name("ID")
        .takes_value(true)
        .multiple_occurrences(true)
        .help("Category filter; only the first is sent");
    let query = Arg::new("query")
        .long("query")
        .short('q')
        .value_name("TEXT")
        .takes_value(true)
        .help("Free-text filter");
    let id = Arg::new("id").value_name("ID").required(true);

    Command::new("catalog-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Administer the catalog from the command line")
        .subcommand_required(true)
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .help("API base URL (default: $CATALOG_API_URL or http://localhost:8000)"),
        )
        .arg(
            Arg::new("token_file")
                .long("token-file")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .default_value(".catalog-token")
                .help("Where the bearer token is kept between runs"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and remember the token")
                .arg(Arg::new("login").required(true))
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored token"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("ste")
                .about("Manage STE records")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .arg(query.clone())
                        .arg(category.clone())
                        .arg(Arg::new("limit").long("limit").takes_value(true).default_value("100"))
                        .arg(Arg::new("skip").long("skip").takes_value(true).default_value("0")),
                )
                .subcommand(
                    Command::new("export")
                        .about("Fetch every matching record")
                        .arg(query)
                        .arg(category.clone()),
                )
                .subcommand(Command::new("get").arg(id.clone()))
                .subcommand(Command::new("delete").arg(id))
                .subcommand(
                    Command::new("upload")
                        .about("Import a CSV or Excel file")
                        .arg(Arg::new("file").value_name("FILE").required(true)),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Search STE records")
                .arg(Arg::new("text").value_name("TEXT").required(true))
                .arg(Arg::new("exact").long("exact"))
                .arg(Arg::new("page").long("page").takes_value(true))
                .arg(Arg::new("per_page").long("per-page").takes_value(true))
                .arg(category),
        )
        .subcommand(Command::new("categories").about("List categories"))
        .subcommand(
            Command::new("reaggregate")
                .about("Recompute card membership")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .conflicts_with("ids")
                        .required_unless_present("ids"),
                )
                .arg(Arg::new("ids").value_name("ID").multiple_values(true)),
        )
}

fn parse<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::validation(format!("invalid value for {}: {:?}", name, raw))),
    }
}

fn parse_all<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Vec<T>, Error> {
    matches
        .values_of(name)
        .into_iter()
        .flatten()
        .map(|raw| {
            raw.parse()
                .map_err(|_| Error::validation(format!("invalid value for {}: {:?}", name, raw)))
        })
        .collect()
}

fn required<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    parse(matches, name)?.ok_or_else(|| Error::validation(format!("missing {}", name)))
}

fn print<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_params(matches: &ArgMatches) -> Result<SteListParams, Error> {
    let mut params = SteListParams::new().with_categories(&parse_all::<i64>(matches, "category")?);
    if let Some(query) = matches.value_of("query") {
        params = params.with_query(query);
    }
    Ok(params)
}

async fn run(matches: ArgMatches) -> Result<(), Error> {
    let mut options = ClientOptions::from_env();
    if let Some(url) = matches.value_of("url") {
        options = options.with_base_url(url);
    }
    let token_file = matches.value_of("token_file").unwrap_or(".catalog-token");
    let client = CatalogClient::with_storage(options, Arc::new(FileTokenStorage::new(token_file)))?;

    match matches.subcommand() {
        Some(("login", sub)) => {
            let login = sub.value_of("login").unwrap_or_default();
            let password = sub.value_of("password").unwrap_or_default();
            let state = client.sign_in(login, password).await?;
            print(&state.user())
        }
        Some(("logout", _)) => {
            client.sign_out();
            Ok(())
        }
        Some(("whoami", _)) => print(&client.auth_store().get()),
        Some(("ste", sub)) => match sub.subcommand() {
            Some(("list", args)) => {
                let params = list_params(args)?
                    .with_limit(required(args, "limit")?)
                    .with_skip(required(args, "skip")?);
                print(&client.ste().list(&params).await?)
            }
            Some(("export", args)) => print(&client.ste().fetch_all(&list_params(args)?).await?),
            Some(("get", args)) => print(&client.ste().get(required(args, "id")?).await?),
            Some(("delete", args)) => print(&client.ste().delete(required(args, "id")?).await?),
            Some(("upload", args)) => {
                let path = args.value_of("file").unwrap_or_default();
                let file = UploadFile::from_path(path).await?;
                print(&client.ste().upload(file).await?)
            }
            _ => Err(Error::validation("unknown ste command")),
        },
        Some(("search", args)) => {
            let mut params = SearchParams::new(args.value_of("text").unwrap_or_default())
                .exact(args.is_present("exact"))
                .categories(&parse_all::<i64>(args, "category")?);
            if let Some(page) = parse(args, "page")? {
                params = params.page(page);
            }
            if let Some(per_page) = parse(args, "per_page")? {
                params = params.per_page(per_page);
            }
            print(&client.search().search(&params).await?)
        }
        Some(("categories", _)) => print(&client.categories().list().await?),
        Some(("reaggregate", args)) => {
            let ids = parse_all::<i64>(args, "ids")?;
            let selection = (!args.is_present("all")).then(|| ids.as_slice());
            print(&client.aggregation().reaggregate_selection(selection).await?)
        }
        _ => Err(Error::validation("unknown command")),
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(e) = run(cli().get_matches()).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
