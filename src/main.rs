use dispatchd::command::Error;


#[tokio::main]
async fn main() -> Result<(), Error> {
    dispatchd::command::run().await
}
